//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod contact;
pub mod health;
pub mod network_events;
pub mod redirect;
pub mod visit;

pub use contact::contact_handler;
pub use health::{health_handler, index_handler};
pub use network_events::{clickback_handler, postback_handler};
pub use redirect::redirect_handler;
pub use visit::visit_handler;
