//! Repository trait for candidate destination URLs.

use crate::domain::entities::{CandidateUrl, NewCandidate};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for candidate URLs.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCandidateRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Fetches every candidate of a category, ordered by id.
    ///
    /// Returns an empty vector for unknown categories.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_category(&self, category: &str) -> Result<Vec<CandidateUrl>, AppError>;

    /// Inserts a candidate.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the same destination already exists
    /// in the category.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_candidate: NewCandidate) -> Result<CandidateUrl, AppError>;

    /// Lists candidates, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, category: Option<String>) -> Result<Vec<CandidateUrl>, AppError>;

    /// Deletes a candidate by id.
    ///
    /// Returns `Ok(false)` if no row matched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Counts distinct categories. Doubles as the store health probe.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_categories(&self) -> Result<i64, AppError>;
}
