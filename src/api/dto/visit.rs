//! DTOs for the visit beacon endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::tracking_param::TrackingParams;

/// Page-view beacon posted by landing pages.
///
/// ```json
/// {
///   "page_url": "https://landing.example/offer",
///   "category": "finance",
///   "click_id": "42",
///   "utm_source": "mgid"
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct VisitBeaconRequest {
    #[validate(url(message = "Invalid page URL"))]
    pub page_url: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,

    #[serde(flatten)]
    pub params: TrackingParams,
}

#[derive(Debug, Serialize)]
pub struct VisitBeaconResponse {
    pub status: &'static str,
}
