//! Compliance rule database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for compliance_rules table
///
/// Enum columns are stored as TEXT and parsed in the mapper.
#[derive(Debug, Clone, FromRow)]
pub struct RuleModel {
    pub id: Uuid,
    pub state_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub severity: String,
    pub citation: Option<String>,
    pub source_url: Option<String>,
    pub source_type: String,
    pub product_types: Vec<String>,
    pub validation_prompt: Option<String>,
    pub is_active: bool,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
