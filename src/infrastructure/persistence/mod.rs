//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! bound parameters.
//!
//! # Repositories
//!
//! - [`PgCandidateRepository`] - Candidate URL storage and category lookup
//! - [`PgVisitRepository`] - Append-only visit log
//! - [`PgLeadRepository`] - Contact form submissions
//! - [`PgNetworkEventRepository`] - Postbacks and clickbacks

pub mod pg_candidate_repository;
pub mod pg_lead_repository;
pub mod pg_network_event_repository;
pub mod pg_visit_repository;

pub use pg_candidate_repository::PgCandidateRepository;
pub use pg_lead_repository::PgLeadRepository;
pub use pg_network_event_repository::PgNetworkEventRepository;
pub use pg_visit_repository::PgVisitRepository;
