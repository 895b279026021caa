//! Repository trait for affiliate postbacks and clickbacks.

use crate::domain::entities::{NetworkEvent, NewNetworkEvent};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkEventRepository: Send + Sync {
    /// Stores one network notification.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record(&self, new_event: NewNetworkEvent) -> Result<NetworkEvent, AppError>;
}
