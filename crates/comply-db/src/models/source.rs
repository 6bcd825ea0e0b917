//! Regulatory source database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for regulatory_sources table
#[derive(Debug, Clone, FromRow)]
pub struct SourceModel {
    pub id: Uuid,
    pub state_id: Uuid,
    pub source_name: String,
    pub source_url: String,
    pub content_hash: Option<String>,
    pub last_checked: Option<DateTime<Utc>>,
    pub last_content_change: Option<DateTime<Utc>>,
    pub check_frequency_days: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
