//! DTOs for postback and clickback endpoints.

use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};

/// Query string sent by an affiliate network.
///
/// Unrecognised parameters are ignored here; the raw query string is stored
/// alongside the parsed fields.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct NetworkEventQuery {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub click_id: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub network: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub status: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub payout: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NetworkEventResponse {
    pub status: &'static str,
    pub id: i64,
}
