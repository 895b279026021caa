//! Repository trait for contact form leads.

use crate::domain::entities::{Lead, NewLead};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Stores one contact submission.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_lead: NewLead) -> Result<Lead, AppError>;
}
