//! Handler for the contact form.

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::HeaderMap,
};
use std::net::SocketAddr;
use validator::Validate;

use crate::api::dto::contact::{ContactForm, ContactResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_info::client_info_from_headers;

/// Stores a lead submitted from a landing page.
///
/// # Endpoint
///
/// `POST /api/contact`
///
/// # Request Body
///
/// ```json
/// { "name": "Ivan", "phone": "+7 900 123-45-67" }
/// ```
///
/// # Response
///
/// ```json
/// { "status": "ok", "message": "Contact received" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the form fails validation.
/// Returns 500 Internal Server Error if the lead cannot be stored.
pub async fn contact_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(form): Json<ContactForm>,
) -> Result<Json<ContactResponse>, AppError> {
    form.validate()?;

    let client = client_info_from_headers(&headers, addr, state.behind_proxy);

    state
        .lead_service
        .submit(&form.name, &form.phone, &client)
        .await?;

    Ok(Json(ContactResponse {
        status: "ok",
        message: "Contact received",
    }))
}
