//! API route configuration.
//!
//! Routes nested under `/api`, each group behind its own per-IP rate limit
//! from [`crate::api::middleware::rate_limit`].

use crate::api::handlers::{contact_handler, visit_handler};
use crate::api::middleware::rate_limit;
use crate::state::AppState;
use axum::{Router, routing::post};

/// Public API routes called from landing pages.
///
/// # Endpoints
///
/// - `POST /contact` - Submit a lead (strict rate limit)
/// - `POST /visit`   - Page-view beacon (relaxed rate limit)
pub fn public_routes(behind_proxy: bool) -> Router<AppState> {
    let contact = Router::new()
        .route("/contact", post(contact_handler))
        .layer(rate_limit::secure_layer(behind_proxy));

    let visit = Router::new()
        .route("/visit", post(visit_handler))
        .layer(rate_limit::layer(behind_proxy));

    Router::new().merge(contact).merge(visit)
}
