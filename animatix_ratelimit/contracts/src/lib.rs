use std::{future::Future, net::IpAddr};

use chrono::{DateTime, Utc};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RateLimitService: Send + Sync + 'static {
    /// Records the request attributed to `client`, unless the client has
    /// exhausted its budget for the current window.
    ///
    /// A rejected attempt is not recorded.
    fn reserve(&self, client: IpAddr) -> impl Future<Output = Result<(), RateLimitError>> + Send;
}

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Request budget for the current window is exhausted.")]
    Exceeded,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Storage for the per-client ledger of accepted request timestamps.
///
/// The service removes an entry, filters it and writes it back; concurrent
/// requests from the same client may interleave between `take` and `put`,
/// which can admit slightly more than the configured budget. That race is
/// accepted.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RateLimitStore: Send + Sync + 'static {
    /// Removes and returns the timestamps recorded for `client`.
    fn take(
        &self,
        client: IpAddr,
    ) -> impl Future<Output = anyhow::Result<Vec<DateTime<Utc>>>> + Send;

    /// Stores `timestamps` as the new entry for `client`.
    fn put(
        &self,
        client: IpAddr,
        timestamps: Vec<DateTime<Utc>>,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[cfg(feature = "mock")]
impl MockRateLimitService {
    pub fn with_reserve(mut self, client: IpAddr, result: Result<(), RateLimitError>) -> Self {
        self.expect_reserve()
            .once()
            .with(mockall::predicate::eq(client))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}

#[cfg(feature = "mock")]
impl MockRateLimitStore {
    pub fn with_take(mut self, client: IpAddr, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.expect_take()
            .once()
            .with(mockall::predicate::eq(client))
            .return_once(move |_| Box::pin(std::future::ready(Ok(timestamps))));
        self
    }

    pub fn with_put(mut self, client: IpAddr, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.expect_put()
            .once()
            .with(
                mockall::predicate::eq(client),
                mockall::predicate::eq(timestamps),
            )
            .return_once(move |_, _| Box::pin(std::future::ready(Ok(()))));
        self
    }
}
