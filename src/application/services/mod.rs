//! Business logic services for the application layer.

pub mod lead_service;
pub mod network_event_service;
pub mod redirect_service;

pub use lead_service::LeadService;
pub use network_event_service::{NetworkEventService, NetworkNotification};
pub use redirect_service::{RedirectService, Resolution};
