//! Caching layer for fast redirect resolution.
//!
//! Candidates are cached per category in process memory with a TTL. There is
//! no shared cache between instances; each process refills on its own.

mod candidate_cache;

pub use candidate_cache::{CandidateCache, CandidateSnapshot};
