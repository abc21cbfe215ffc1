//! Submission-side of the contact pipeline.
//!
//! [`ContactForm`] drives the lifecycle the site shell renders: editable
//! field state, pre-flight validation, a single in-flight submission at a
//! time and a status banner. [`api::RestContactApi`] is the wire client
//! behind it.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use animatix_models::contact::{SubmissionResult, CONTACT_EMAIL_REGEX};
use animatix_shared_contracts::time::TimeService;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::api::ContactApi;

pub mod api;

/// How long a success banner stays visible.
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(5);

/// Shown for any network-level fault; the raw error never reaches the UI.
pub const NETWORK_FAILURE_MESSAGE: &str =
    "There was an error sending your message. Please try again later.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Pre-flight validation, in presentation order. The relay re-checks all of
/// this server-side.
pub fn validate(fields: &ContactFields) -> Result<(), &'static str> {
    if fields.name.trim().is_empty() {
        return Err("Please enter your name");
    }
    if !CONTACT_EMAIL_REGEX.is_match(&fields.email) {
        return Err("Please enter a valid email address");
    }
    if fields.message.trim().is_empty() {
        return Err("Please enter a message");
    }
    Ok(())
}

#[derive(Debug)]
pub struct ContactForm<Api, Time> {
    api: Api,
    time: Time,
    state: Mutex<FormState>,
    in_flight: AtomicBool,
}

#[derive(Debug, Default)]
struct FormState {
    fields: ContactFields,
    banner: Option<StatusBanner>,
}

#[derive(Debug)]
struct StatusBanner {
    result: SubmissionResult,
    shown_at: DateTime<Utc>,
}

impl<Api, Time> ContactForm<Api, Time>
where
    Api: ContactApi,
    Time: TimeService,
{
    pub fn new(api: Api, time: Time) -> Self {
        Self {
            api,
            time,
            state: Mutex::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.state().fields.name = name.into();
    }

    pub fn set_email(&self, email: impl Into<String>) {
        self.state().fields.email = email.into();
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.state().fields.message = message.into();
    }

    pub fn fields(&self) -> ContactFields {
        self.state().fields.clone()
    }

    /// Whether a submission is currently in flight; the submit control stays
    /// disabled while this is true.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Runs one submission attempt. A call while another attempt is in
    /// flight does nothing.
    ///
    /// Validation failures and network faults both end up in the status
    /// banner; a structured verdict from the relay is shown unchanged. On
    /// success the fields are cleared.
    pub async fn submit(&self) {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return;
        }

        let fields = {
            let mut state = self.state();
            state.banner = None;
            state.fields.clone()
        };

        let result = match validate(&fields) {
            Err(reason) => SubmissionResult::err(reason),
            Ok(()) => self.api.submit(fields).await.unwrap_or_else(|err| {
                debug!("contact submission failed on the wire: {err}");
                SubmissionResult::err(NETWORK_FAILURE_MESSAGE)
            }),
        };

        let shown_at = self.time.now();
        let mut state = self.state();
        if result.success {
            state.fields = ContactFields::default();
        }
        state.banner = Some(StatusBanner { result, shown_at });
        drop(state);

        self.in_flight.store(false, Ordering::SeqCst);
    }

    /// The banner to render, if any. Success banners expire
    /// [`SUCCESS_BANNER_TTL`] after they were set; failure banners persist
    /// until the next attempt.
    pub fn status(&self) -> Option<SubmissionResult> {
        let state = self.state();
        let banner = state.banner.as_ref()?;
        if banner.result.success && self.time.now() >= banner.shown_at + SUCCESS_BANNER_TTL {
            return None;
        }
        Some(banner.result.clone())
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
