//! Rule change suggestion database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for rule_change_suggestions table
#[derive(Debug, Clone, FromRow)]
pub struct SuggestionModel {
    pub id: Uuid,
    pub state_id: Uuid,
    pub source_id: Option<Uuid>,
    pub existing_rule_id: Option<Uuid>,
    pub change_type: String,
    pub suggested_name: String,
    pub suggested_description: Option<String>,
    pub suggested_category: Option<String>,
    pub suggested_severity: Option<String>,
    pub suggested_citation: Option<String>,
    pub suggested_source_url: Option<String>,
    pub ai_reasoning: Option<String>,
    pub source_excerpt: Option<String>,
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
