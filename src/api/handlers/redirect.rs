//! Handler for category redirects.

use axum::{
    Json,
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::debug;

use crate::api::dto::redirect::{RedirectQuery, ResolveErrorResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_info::client_info_from_headers;

/// Redirects a visitor to a random destination of the requested category.
///
/// # Endpoint
///
/// `GET /redirect?category={category}&teaser_id=..&click_id=..`
///
/// # Request Flow
///
/// 1. Read the candidate list of `category` through the in-memory cache
/// 2. Pick one candidate uniformly at random
/// 3. Substitute `{param}` placeholders from the query string
/// 4. Hand the visit to the background log (never awaited)
/// 5. Return `302 Found` with the destination in `Location`
///
/// # Errors
///
/// Returns 400 Bad Request if `category` is missing.
///
/// Resolution failures (unknown category, missing parameter) are answered
/// with `200 OK` and a JSON body:
///
/// ```json
/// { "error": "No URLs found for category 'cars'", "code": "no_candidates" }
/// ```
pub async fn redirect_handler(
    Query(query): Query<RedirectQuery>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let category = query.category.ok_or_else(|| {
        AppError::bad_request(
            "Missing required parameter 'category'",
            json!({ "field": "category" }),
        )
    })?;

    let client = client_info_from_headers(&headers, addr, state.behind_proxy);

    match state
        .redirect_service
        .resolve(&category, query.params, client)
        .await
    {
        Ok(resolution) => {
            debug!(
                "Redirecting {} via candidate {} to {}",
                category, resolution.candidate.id, resolution.url
            );
            Ok((StatusCode::FOUND, [(header::LOCATION, resolution.url)]).into_response())
        }
        Err(e) => {
            debug!("Redirect for {} not resolved: {}", category, e);
            Ok(Json(ResolveErrorResponse::from(&e)).into_response())
        }
    }
}
