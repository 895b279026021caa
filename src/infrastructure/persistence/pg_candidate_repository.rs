//! PostgreSQL implementation of candidate repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{CandidateUrl, NewCandidate};
use crate::domain::repositories::CandidateRepository;
use crate::error::AppError;

/// PostgreSQL repository for candidate URLs.
pub struct PgCandidateRepository {
    pool: Arc<PgPool>,
}

impl PgCandidateRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateRepository for PgCandidateRepository {
    async fn find_by_category(&self, category: &str) -> Result<Vec<CandidateUrl>, AppError> {
        let rows = sqlx::query_as::<_, CandidateUrl>(
            r#"
            SELECT id, domain, path_template, category, network, geography, created_at
            FROM candidate_urls
            WHERE category = $1
            ORDER BY id
            "#,
        )
        .bind(category)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn create(&self, new_candidate: NewCandidate) -> Result<CandidateUrl, AppError> {
        let row = sqlx::query_as::<_, CandidateUrl>(
            r#"
            INSERT INTO candidate_urls (domain, path_template, category, network, geography)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, domain, path_template, category, network, geography, created_at
            "#,
        )
        .bind(&new_candidate.domain)
        .bind(&new_candidate.path_template)
        .bind(&new_candidate.category)
        .bind(&new_candidate.network)
        .bind(&new_candidate.geography)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn list(&self, category: Option<String>) -> Result<Vec<CandidateUrl>, AppError> {
        let rows = sqlx::query_as::<_, CandidateUrl>(
            r#"
            SELECT id, domain, path_template, category, network, geography, created_at
            FROM candidate_urls
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY category, id
            "#,
        )
        .bind(category)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM candidate_urls WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_categories(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT category) FROM candidate_urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
