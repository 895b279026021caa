//! DTOs for the redirect endpoint.

use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};

use crate::domain::errors::ResolveError;
use crate::domain::tracking_param::TrackingParams;

/// Query string of `GET /redirect`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub category: Option<String>,

    #[serde(flatten)]
    pub params: TrackingParams,
}

/// Payload returned when resolution fails.
///
/// Sent with `200 OK`; `code` distinguishes the failure kinds.
#[derive(Debug, Serialize)]
pub struct ResolveErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl From<&ResolveError> for ResolveErrorResponse {
    fn from(err: &ResolveError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code(),
        }
    }
}
