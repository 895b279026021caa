//! Lead captured from the contact form.

use chrono::{DateTime, Utc};

/// A stored contact submission.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for recording a lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    pub phone: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}
