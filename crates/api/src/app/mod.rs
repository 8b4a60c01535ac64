//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repository/service wiring (in-memory or Postgres)
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware;
use crate::rate_limit::RateLimiter;

pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Layers, outermost first: request tracing, rate limiting, request timeout.
pub fn build_app(services: Arc<services::AppServices>, config: &AppConfig) -> Router {
    let limiter = Arc::new(RateLimiter::per_minute(config.rate_limit_per_minute));

    routes::router()
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::trace_request))
                .layer(axum::middleware::from_fn_with_state(
                    limiter,
                    middleware::rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    config.request_timeout,
                    middleware::request_timeout,
                )),
        )
}
