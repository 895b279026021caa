//! PostgreSQL implementation of lead repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Lead, NewLead};
use crate::domain::repositories::LeadRepository;
use crate::error::AppError;

pub struct PgLeadRepository {
    pool: Arc<PgPool>,
}

impl PgLeadRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadRepository for PgLeadRepository {
    async fn create(&self, new_lead: NewLead) -> Result<Lead, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (name, phone, ip, user_agent)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, phone, ip, user_agent, created_at
            "#,
        )
        .bind(&new_lead.name)
        .bind(&new_lead.phone)
        .bind(&new_lead.ip)
        .bind(&new_lead.user_agent)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(lead)
    }
}
