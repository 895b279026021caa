//! Repository trait for the append-only visit log.

use crate::domain::entities::{NewVisit, Visit};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for visit records.
///
/// Only the background worker writes through it; request handlers never
/// await it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Appends one visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_visit(&self, new_visit: NewVisit) -> Result<Visit, AppError>;
}
