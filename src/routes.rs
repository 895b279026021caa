//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`             - Liveness root
//! - `GET  /redirect`     - Category redirect (302 or JSON error)
//! - `GET  /postback`     - Conversion notification from a network
//! - `GET  /clickback`    - Click confirmation from a network
//! - `GET  /health`       - Health check: DB, visit queue, candidate cache
//! - `POST /api/contact`  - Lead capture
//! - `POST /api/visit`    - Page-view beacon
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on `/api/*`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{
    clickback_handler, health_handler, index_handler, postback_handler, redirect_handler,
};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/", get(index_handler))
        .route("/redirect", get(redirect_handler))
        .route("/postback", get(postback_handler))
        .route("/clickback", get(clickback_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::public_routes(behind_proxy))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
