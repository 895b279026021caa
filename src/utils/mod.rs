//! Helper functions used by HTTP handlers.
//!
//! - [`client_info`] - Client IP, language and platform from request headers

pub mod client_info;
