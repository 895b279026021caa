//! Core domain entities.
//!
//! Entities are plain data structures. Records that are written follow the
//! "New Type" pattern with a separate input struct:
//! - `NewCandidate`, `NewVisit`, `NewLead`, `NewNetworkEvent`
//!
//! # Entity Types
//!
//! - [`CandidateUrl`] - A templated destination inside a campaign category
//! - [`Visit`] - One attributed visit (redirect or beacon)
//! - [`Lead`] - A contact form submission
//! - [`NetworkEvent`] - An affiliate postback or clickback

pub mod candidate;
pub mod lead;
pub mod network_event;
pub mod visit;

pub use candidate::{CandidateUrl, CompiledCandidate, NewCandidate};
pub use lead::{Lead, NewLead};
pub use network_event::{NetworkEvent, NetworkEventKind, NewNetworkEvent};
pub use visit::{NewVisit, Visit, VisitSource};
