//! Reject over-budget clients before the guarded handler does any work.

use std::{
    net::{IpAddr, Ipv4Addr},
    sync::Arc,
};

use animatix_ratelimit_contracts::{RateLimitError, RateLimitService};
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::{from_fn, Next},
    Router,
};

use crate::{
    middlewares::client_ip::ClientIp,
    routes::{error, internal_server_error},
};

pub fn add<S: Clone + Send + Sync + 'static>(
    router: Router<S>,
    service: Arc<impl RateLimitService>,
) -> Router<S> {
    router.layer(from_fn(move |request: Request, next: Next| {
        let service = Arc::clone(&service);
        async move {
            let ClientIp(client) = request
                .extensions()
                .get::<ClientIp>()
                .copied()
                .unwrap_or(ClientIp(IpAddr::V4(Ipv4Addr::LOCALHOST)));

            match service.reserve(client).await {
                Ok(()) => next.run(request).await,
                Err(RateLimitError::Exceeded) => error(
                    StatusCode::TOO_MANY_REQUESTS,
                    "Too many requests, please try again later.",
                ),
                Err(RateLimitError::Other(err)) => internal_server_error(err),
            }
        }
    }))
}
