//! Contact form lead capture.

use std::sync::Arc;
use tracing::{error, info};

use crate::domain::entities::{Lead, NewLead};
use crate::domain::repositories::LeadRepository;
use crate::domain::visit_event::ClientInfo;
use crate::error::AppError;

/// Service persisting contact submissions.
///
/// Input is validated at the DTO boundary; this service normalises
/// whitespace and writes a single row.
pub struct LeadService {
    repository: Arc<dyn LeadRepository>,
}

impl LeadService {
    pub fn new(repository: Arc<dyn LeadRepository>) -> Self {
        Self { repository }
    }

    /// Stores a contact submission.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field is blank after trimming.
    /// Returns [`AppError::Internal`] if the store write fails.
    pub async fn submit(
        &self,
        name: &str,
        phone: &str,
        client: &ClientInfo,
    ) -> Result<Lead, AppError> {
        let name = name.trim();
        let phone = phone.trim();

        if name.is_empty() || phone.is_empty() {
            return Err(AppError::bad_request(
                "Name and phone must not be blank",
                serde_json::json!({}),
            ));
        }

        let new_lead = NewLead {
            name: name.to_string(),
            phone: phone.to_string(),
            ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
        };

        match self.repository.create(new_lead).await {
            Ok(lead) => {
                info!("Lead {} received", lead.id);
                Ok(lead)
            }
            Err(e) => {
                error!("Failed to store lead: {}", e);
                Err(e)
            }
        }
    }
}
