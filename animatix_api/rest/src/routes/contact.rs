use std::sync::Arc;

use animatix_core_contact_contracts::{ContactSendMessageError, ContactService};
use animatix_models::contact::{ContactSubmission, SubmissionResult};
use animatix_ratelimit_contracts::RateLimitService;
use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Form, Json, Router,
};

use super::error;
use crate::{
    middlewares,
    models::contact::{ApiContactForm, ApiContactFormError},
    CONTACT_PATH,
};

pub fn router(
    service: Arc<impl ContactService>,
    rate_limit: Arc<impl RateLimitService>,
) -> Router<()> {
    let router = Router::new()
        .route(CONTACT_PATH, routing::post(send_message))
        .with_state(service);

    // The budget check runs before the handler, so rejected requests never
    // touch the email transport.
    middlewares::rate_limit::add(router, rate_limit)
}

async fn send_message(
    service: State<Arc<impl ContactService>>,
    form: Result<Form<ApiContactForm>, FormRejection>,
) -> Response {
    let Ok(Form(form)) = form else {
        return error(StatusCode::BAD_REQUEST, "Invalid request body");
    };

    let submission = match ContactSubmission::try_from(form) {
        Ok(submission) => submission,
        Err(ApiContactFormError::MissingFields) => {
            return error(StatusCode::BAD_REQUEST, "All fields are required");
        }
        Err(ApiContactFormError::InvalidEmail) => {
            return error(StatusCode::BAD_REQUEST, "Invalid email format");
        }
    };

    match service.send_message(submission).await {
        Ok(()) => Json(SubmissionResult::ok("Message sent successfully!")).into_response(),
        Err(ContactSendMessageError::NotConfigured) => {
            tracing::error!("contact message rejected: smtp credentials are not configured");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Server configuration error")
        }
        Err(ContactSendMessageError::Send) => {
            tracing::error!("smtp transport rejected the contact message");
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send message. Please try again later.",
            )
        }
        Err(ContactSendMessageError::Other(err)) => {
            tracing::error!("failed to relay contact message: {err}");
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send message. Please try again later.",
            )
        }
    }
}
