//! Attach the best-effort client address to each request.
//!
//! The first value of the forwarded-address header wins when present. The
//! header is trivially spoofable; whether it can be trusted depends on what
//! sits in front of this server, which is a deployment concern, not ours.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request},
    middleware::{from_fn, Next},
    Router,
};
use tracing::debug;

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.layer(from_fn(|mut request: Request, next: Next| {
        let client_ip = ClientIp::from_request(&request);
        request.extensions_mut().insert(client_ip);
        next.run(request)
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientIp(pub IpAddr);

impl ClientIp {
    fn from_request(request: &Request) -> Self {
        if let Some(header_value) = request.headers().get(FORWARDED_FOR_HEADER) {
            let forwarded = header_value
                .to_str()
                .ok()
                .and_then(|value| value.split(',').next())
                .and_then(|first| first.trim().parse().ok());
            match forwarded {
                Some(ip) => return Self(ip),
                None => debug!(?header_value, "failed to parse forwarded address header"),
            }
        }

        // Requests that never went through a socket (local tooling, tests)
        // are bucketed under loopback.
        Self(
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.ip())
                .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        )
    }
}
