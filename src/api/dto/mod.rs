//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON/query deserialization and validator for
//! input validation.

pub mod contact;
pub mod health;
pub mod network_event;
pub mod redirect;
pub mod visit;
