use std::sync::Arc;

use animatix_api_rest::RestServer;
use animatix_config::{Config, SmtpCredentials};
use animatix_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use animatix_core_health_impl::{HealthServiceConfig, HealthServiceImpl};
use animatix_email_contracts::EmailService;
use animatix_ratelimit_impl::{store::MemoryRateLimitStore, RateLimitServiceImpl};
use animatix_shared_impl::time::TimeServiceImpl;
use tracing::{info, warn};

use crate::email;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let email = match SmtpCredentials::from_env()? {
        Some(credentials) => {
            info!("Connecting to smtp server");
            let email = email::connect(&config.email, credentials)?;
            email.ping().await?;
            Some(email)
        }
        None => {
            // Still serve: submissions are answered with a configuration
            // error until the credentials show up in the environment.
            warn!("Smtp credentials are not configured, contact submissions will be rejected");
            None
        }
    };

    let time = TimeServiceImpl;

    let health = HealthServiceImpl::new(
        time,
        email.clone(),
        HealthServiceConfig {
            cache_ttl: config.health.cache_ttl.into(),
        },
    );
    let contact = ContactServiceImpl::new(
        email,
        ContactServiceConfig {
            recipient: Arc::new(config.contact.recipient),
        },
    );
    let rate_limit = RateLimitServiceImpl::new(time, MemoryRateLimitStore::default());

    let server = RestServer::new(health, contact, rate_limit);
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
