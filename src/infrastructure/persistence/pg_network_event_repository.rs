//! PostgreSQL implementation of network event repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NetworkEvent, NewNetworkEvent};
use crate::domain::repositories::NetworkEventRepository;
use crate::error::AppError;

/// PostgreSQL repository for postbacks and clickbacks.
pub struct PgNetworkEventRepository {
    pool: Arc<PgPool>,
}

impl PgNetworkEventRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NetworkEventRepository for PgNetworkEventRepository {
    async fn record(&self, new_event: NewNetworkEvent) -> Result<NetworkEvent, AppError> {
        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO network_events (kind, click_id, network, status, payout, raw_query, ip)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, created_at
            "#,
        )
        .bind(new_event.kind.as_str())
        .bind(&new_event.click_id)
        .bind(&new_event.network)
        .bind(&new_event.status)
        .bind(new_event.payout)
        .bind(&new_event.raw_query)
        .bind(&new_event.ip)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(NetworkEvent {
            id,
            created_at,
            event: new_event,
        })
    }
}
