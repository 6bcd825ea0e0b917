//! Rule audit log database model

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for rule_audit_log table
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogModel {
    pub id: Uuid,
    pub rule_id: Option<Uuid>,
    pub state_id: Option<Uuid>,
    pub action: String,
    pub changed_by: Option<Uuid>,
    pub change_reason: Option<String>,
    /// JSONB snapshot of the rule before the change
    pub previous_version: Option<JsonValue>,
    /// JSONB snapshot of the rule after the change
    pub new_version: Option<JsonValue>,
    pub suggestion_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
