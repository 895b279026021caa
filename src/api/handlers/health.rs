//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Liveness root. Touches no dependency.
///
/// `GET /` returns `{"hello": "world"}`.
pub async fn index_handler() -> Json<Value> {
    Json(json!({ "hello": "world" }))
}

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: Counts candidate categories
/// 2. **Visit Queue**: Checks the channel is open, reports capacity and counters
/// 3. **Candidate Cache**: Reports cached categories and TTL
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 3 categories" },
///     "visit_queue": {
///       "status": "ok",
///       "message": "Capacity: 9998/10000",
///       "counts": { "enqueued": 12, "dropped": 0, "persisted": 10, "failed": 0 }
///     },
///     "candidate_cache": { "status": "ok", "message": "2 categories cached, TTL 300s" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;

    let queue_check = check_visit_queue(&state);

    let cache_check = check_cache(&state);

    let all_healthy = db_check.is_ok() && queue_check.is_ok() && cache_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            visit_queue: queue_check,
            candidate_cache: cache_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.redirect_service.count_categories().await {
        Ok(count) => CheckStatus::ok(format!("Connected, {} categories", count)),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

fn check_visit_queue(state: &AppState) -> CheckStatus {
    let mut check = if state.visits.is_closed() {
        CheckStatus::error("Visit queue is closed")
    } else {
        CheckStatus::ok(format!(
            "Capacity: {}/{}",
            state.visits.capacity(),
            state.visits.max_capacity()
        ))
    };
    check.counts = Some(state.visits.metrics().snapshot());
    check
}

fn check_cache(state: &AppState) -> CheckStatus {
    let cache = state.redirect_service.cache();
    CheckStatus::ok(format!(
        "{} categories cached, TTL {}s",
        cache.len(),
        cache.ttl().as_secs()
    ))
}
