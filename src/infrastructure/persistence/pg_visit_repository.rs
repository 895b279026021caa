//! PostgreSQL implementation of the visit log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewVisit, Visit};
use crate::domain::repositories::VisitRepository;
use crate::error::AppError;

/// PostgreSQL repository appending rows to `visits`.
pub struct PgVisitRepository {
    pool: Arc<PgPool>,
}

impl PgVisitRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn record_visit(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        let params = &new_visit.params;

        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO visits (
                source, category, network, destination_url, page_url,
                teaser_id, click_id, campaign_id, site_id, cpc, content, utm_source, news_id,
                referer, ip, user_agent, language, platform, occurred_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING id, created_at
            "#,
        )
        .bind(new_visit.source.as_str())
        .bind(&new_visit.category)
        .bind(&new_visit.network)
        .bind(&new_visit.destination_url)
        .bind(&new_visit.page_url)
        .bind(&params.teaser_id)
        .bind(&params.click_id)
        .bind(&params.campaign_id)
        .bind(&params.site_id)
        .bind(&params.cpc)
        .bind(&params.content)
        .bind(&params.utm_source)
        .bind(&params.news_id)
        .bind(&new_visit.referer)
        .bind(&new_visit.ip)
        .bind(&new_visit.user_agent)
        .bind(&new_visit.language)
        .bind(&new_visit.platform)
        .bind(new_visit.occurred_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Visit {
            id,
            created_at,
            visit: new_visit,
        })
    }
}
