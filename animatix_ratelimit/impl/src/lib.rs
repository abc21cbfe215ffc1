use std::{net::IpAddr, time::Duration};

use animatix_ratelimit_contracts::{RateLimitError, RateLimitService, RateLimitStore};
use animatix_shared_contracts::time::TimeService;
use tracing::debug;

pub mod store;

/// Width of the sliding window.
pub const WINDOW: Duration = Duration::from_secs(60);

/// Accepted requests per client within one window.
pub const MAX_REQUESTS_PER_WINDOW: usize = 5;

#[derive(Debug, Clone)]
pub struct RateLimitServiceImpl<Time, Store> {
    time: Time,
    store: Store,
}

impl<Time, Store> RateLimitServiceImpl<Time, Store> {
    pub fn new(time: Time, store: Store) -> Self {
        Self { time, store }
    }
}

impl<Time, Store> RateLimitService for RateLimitServiceImpl<Time, Store>
where
    Time: TimeService,
    Store: RateLimitStore,
{
    async fn reserve(&self, client: IpAddr) -> Result<(), RateLimitError> {
        let now = self.time.now();
        let window_start = now - WINDOW;

        // Timestamps outside the window are evicted here, on every write,
        // so an entry never grows past the recent window.
        let mut recent = self
            .store
            .take(client)
            .await?
            .into_iter()
            .filter(|&timestamp| timestamp > window_start)
            .collect::<Vec<_>>();

        if recent.len() >= MAX_REQUESTS_PER_WINDOW {
            self.store.put(client, recent).await?;
            debug!(%client, "rate limit exhausted");
            return Err(RateLimitError::Exceeded);
        }

        recent.push(now);
        self.store.put(client, recent).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use animatix_ratelimit_contracts::MockRateLimitStore;
    use animatix_shared_contracts::time::MockTimeService;
    use animatix_utils::assert_matches;
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    const CLIENT: IpAddr = IpAddr::V4(std::net::Ipv4Addr::new(203, 0, 113, 7));

    #[tokio::test]
    async fn first_request_admitted() {
        // Arrange
        let now = base_time();

        let time = MockTimeService::new().with_now(now);

        let store = MockRateLimitStore::new()
            .with_take(CLIENT, vec![])
            .with_put(CLIENT, vec![now]);

        let sut = RateLimitServiceImpl::new(time, store);

        // Act
        let result = sut.reserve(CLIENT).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn full_window_rejected_and_not_recorded() {
        // Arrange
        let now = base_time();
        let recent = (1..=MAX_REQUESTS_PER_WINDOW as u64)
            .map(|i| now - Duration::from_secs(i))
            .collect::<Vec<_>>();

        let time = MockTimeService::new().with_now(now);

        let store = MockRateLimitStore::new()
            .with_take(CLIENT, recent.clone())
            .with_put(CLIENT, recent);

        let sut = RateLimitServiceImpl::new(time, store);

        // Act
        let result = sut.reserve(CLIENT).await;

        // Assert
        assert_matches!(result, Err(RateLimitError::Exceeded));
    }

    #[tokio::test]
    async fn expired_timestamps_evicted_on_write() {
        // Arrange
        let now = base_time();
        let stale = vec![
            now - Duration::from_secs(2 * WINDOW.as_secs()),
            now - WINDOW - Duration::from_secs(1),
            now - Duration::from_secs(30),
        ];

        let time = MockTimeService::new().with_now(now);

        let store = MockRateLimitStore::new()
            .with_take(CLIENT, stale)
            .with_put(CLIENT, vec![now - Duration::from_secs(30), now]);

        let sut = RateLimitServiceImpl::new(time, store);

        // Act
        let result = sut.reserve(CLIENT).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn timestamp_on_window_edge_does_not_count() {
        // Arrange
        let now = base_time();

        let time = MockTimeService::new().with_now(now);

        let store = MockRateLimitStore::new()
            .with_take(CLIENT, vec![now - WINDOW])
            .with_put(CLIENT, vec![now]);

        let sut = RateLimitServiceImpl::new(time, store);

        // Act
        let result = sut.reserve(CLIENT).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn budget_frees_up_after_window() {
        // Arrange
        let start = base_time();
        let store = store::MemoryRateLimitStore::default();

        let mut time = MockTimeService::new();
        time.expect_now().return_const(start);
        let sut = RateLimitServiceImpl::new(time, store.clone());

        for _ in 0..MAX_REQUESTS_PER_WINDOW {
            sut.reserve(CLIENT).await.unwrap();
        }
        assert_matches!(sut.reserve(CLIENT).await, Err(RateLimitError::Exceeded));

        let mut time = MockTimeService::new();
        time.expect_now()
            .return_const(start + WINDOW + Duration::from_secs(1));
        let sut = RateLimitServiceImpl::new(time, store);

        // Act
        let result = sut.reserve(CLIENT).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn clients_are_counted_independently() {
        // Arrange
        let now = base_time();
        let other = IpAddr::V4(std::net::Ipv4Addr::new(198, 51, 100, 23));
        let store = store::MemoryRateLimitStore::default();

        let mut time = MockTimeService::new();
        time.expect_now().return_const(now);
        let sut = RateLimitServiceImpl::new(time, store);

        for _ in 0..MAX_REQUESTS_PER_WINDOW {
            sut.reserve(CLIENT).await.unwrap();
        }
        assert_matches!(sut.reserve(CLIENT).await, Err(RateLimitError::Exceeded));

        // Act
        let result = sut.reserve(other).await;

        // Assert
        result.unwrap();
    }
}
