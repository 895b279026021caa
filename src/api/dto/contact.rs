//! DTOs for the contact form endpoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

/// Digits with the usual separators and an optional leading `+`.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\+?[0-9][0-9()\-\s]{3,30}\s*$").unwrap());

/// Contact form submission.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(regex(path = "*PHONE_REGEX", message = "Invalid phone number"))]
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub status: &'static str,
    pub message: &'static str,
}
