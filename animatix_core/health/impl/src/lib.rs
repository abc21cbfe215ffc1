use std::{sync::Arc, time::Duration};

use animatix_core_health_contracts::{HealthService, HealthStatus};
use animatix_email_contracts::EmailService;
use animatix_shared_contracts::time::TimeService;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::error;

#[derive(Debug, Clone)]
pub struct HealthServiceImpl<Time, Email> {
    time: Time,
    email: Option<Email>,
    config: HealthServiceConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthServiceConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: HealthStatus,
    timestamp: DateTime<Utc>,
}

impl<Time, Email> HealthServiceImpl<Time, Email> {
    pub fn new(time: Time, email: Option<Email>, config: HealthServiceConfig) -> Self {
        Self {
            time,
            email,
            config,
            state: Arc::default(),
        }
    }
}

impl<Time, Email> HealthService for HealthServiceImpl<Time, Email>
where
    Time: TimeService,
    Email: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        let Some(email) = &self.email else {
            // No transport credentials, nothing to probe.
            return HealthStatus { email: false };
        };

        let now = self.time.now();
        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.status;
        }

        let email = email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping smtp server: {err}"))
            .is_ok();

        let status = HealthStatus { email };

        cache_guard
            .insert(CachedStatus {
                status,
                timestamp: now,
            })
            .status
    }
}

#[cfg(test)]
mod tests {
    use animatix_email_contracts::MockEmailService;
    use animatix_shared_contracts::time::MockTimeService;
    use chrono::TimeZone;

    use super::*;

    #[tokio::test]
    async fn probes_the_transport() {
        // Arrange
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let time = MockTimeService::new().with_now(now);
        let email = MockEmailService::new().with_ping(Ok(()));

        let sut = HealthServiceImpl::new(time, Some(email), config());

        // Act
        let status = sut.get_status().await;

        // Assert
        assert_eq!(status, HealthStatus { email: true });
    }

    #[tokio::test]
    async fn reports_transport_failure() {
        // Arrange
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let time = MockTimeService::new().with_now(now);
        let email = MockEmailService::new().with_ping(Err(anyhow::anyhow!("connection refused")));

        let sut = HealthServiceImpl::new(time, Some(email), config());

        // Act
        let status = sut.get_status().await;

        // Assert
        assert_eq!(status, HealthStatus { email: false });
    }

    #[tokio::test]
    async fn status_is_cached_within_ttl() {
        // Arrange
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let mut time = MockTimeService::new();
        time.expect_now().times(2).return_const(now);

        // A single ping must serve both calls.
        let email = MockEmailService::new().with_ping(Ok(()));

        let sut = HealthServiceImpl::new(time, Some(email), config());

        // Act
        let first = sut.get_status().await;
        let second = sut.get_status().await;

        // Assert
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unconfigured_transport_reports_unhealthy() {
        // Arrange
        let sut = HealthServiceImpl::<MockTimeService, MockEmailService>::new(
            MockTimeService::new(),
            None,
            config(),
        );

        // Act
        let status = sut.get_status().await;

        // Assert
        assert_eq!(status, HealthStatus { email: false });
    }

    fn config() -> HealthServiceConfig {
        HealthServiceConfig {
            cache_ttl: Duration::from_secs(30),
        }
    }
}
