use std::net::{IpAddr, SocketAddr};

use animatix_core_contact_contracts::ContactService;
use animatix_core_health_contracts::HealthService;
use animatix_ratelimit_contracts::RateLimitService;
use axum::Router;
use tokio::net::TcpListener;

mod middlewares;
mod models;
mod routes;

/// Path guarded by the rate limiter.
pub const CONTACT_PATH: &str = "/api/contact";

#[derive(Debug, Clone)]
pub struct RestServer<Health, Contact, RateLimit> {
    health: Health,
    contact: Contact,
    rate_limit: RateLimit,
}

impl<Health, Contact, RateLimit> RestServer<Health, Contact, RateLimit>
where
    Health: HealthService,
    Contact: ContactService,
    RateLimit: RateLimitService,
{
    pub fn new(health: Health, contact: Contact, rate_limit: RateLimit) -> Self {
        Self {
            health,
            contact,
            rate_limit,
        }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port)).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(
                self.contact.into(),
                self.rate_limit.into(),
            ));

        // Request order: client_ip, panic_handler, request_id, trace. The
        // trace span reads the extensions the outer layers insert.
        let router = middlewares::trace::add(router);
        let router = middlewares::request_id::add(router);
        let router = middlewares::panic_handler::add(router);
        middlewares::client_ip::add(router)
    }
}
