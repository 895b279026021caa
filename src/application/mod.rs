//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers.
//!
//! # Available Services
//!
//! - [`services::redirect_service::RedirectService`] - Category redirect resolution
//! - [`services::lead_service::LeadService`] - Contact form capture
//! - [`services::network_event_service::NetworkEventService`] - Postbacks and clickbacks

pub mod services;
