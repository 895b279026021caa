//! Handler for page-view beacons.

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
};
use std::net::SocketAddr;
use validator::Validate;

use crate::api::dto::visit::{VisitBeaconRequest, VisitBeaconResponse};
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_info::client_info_from_headers;

/// Accepts a page-view beacon and queues it for the visit log.
///
/// # Endpoint
///
/// `POST /api/visit`
///
/// # Response
///
/// `202 Accepted` with `{"status": "accepted"}` once validated. The visit
/// itself is written in the background and may be dropped under overload.
///
/// # Errors
///
/// Returns 400 Bad Request if `page_url` is not a valid URL.
pub async fn visit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<VisitBeaconRequest>,
) -> Result<(StatusCode, Json<VisitBeaconResponse>), AppError> {
    payload.validate()?;

    let client = client_info_from_headers(&headers, addr, state.behind_proxy);

    state.visits.dispatch(VisitEvent::beacon(
        payload.category,
        payload.page_url,
        payload.params,
        client,
    ));

    Ok((
        StatusCode::ACCEPTED,
        Json(VisitBeaconResponse { status: "accepted" }),
    ))
}
