//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access and are implemented by concrete
//! repositories in `crate::infrastructure::persistence`. Mock implementations
//! are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`CandidateRepository`] - Candidate URL lookup and management
//! - [`VisitRepository`] - Append-only visit log
//! - [`LeadRepository`] - Contact form submissions
//! - [`NetworkEventRepository`] - Affiliate postbacks and clickbacks
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod candidate_repository;
pub mod lead_repository;
pub mod network_event_repository;
pub mod visit_repository;

pub use candidate_repository::CandidateRepository;
pub use lead_repository::LeadRepository;
pub use network_event_repository::NetworkEventRepository;
pub use visit_repository::VisitRepository;

#[cfg(test)]
pub use candidate_repository::MockCandidateRepository;
#[cfg(test)]
pub use lead_repository::MockLeadRepository;
#[cfg(test)]
pub use network_event_repository::MockNetworkEventRepository;
#[cfg(test)]
pub use visit_repository::MockVisitRepository;
