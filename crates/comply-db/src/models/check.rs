//! Compliance check, panel upload, and check result database models

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for compliance_checks table
#[derive(Debug, Clone, FromRow)]
pub struct CheckModel {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub state_id: Uuid,
    pub product_type: String,
    pub status: String,
    pub pass_count: i32,
    pub warning_count: i32,
    pub fail_count: i32,
    pub overall_status: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Database model for panel_uploads table
#[derive(Debug, Clone, FromRow)]
pub struct PanelModel {
    pub id: Uuid,
    pub check_id: Uuid,
    pub panel_type: String,
    pub object_key: String,
    pub content_type: String,
    pub extraction: Option<JsonValue>,
    pub flagged_for_review: bool,
    pub flag_reasons: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Database model for check_results table
#[derive(Debug, Clone, FromRow)]
pub struct CheckResultModel {
    pub id: Uuid,
    pub check_id: Uuid,
    pub rule_id: Uuid,
    pub rule_name: String,
    pub status: String,
    pub found_value: Option<String>,
    pub expected_value: Option<String>,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
}
