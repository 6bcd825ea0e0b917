//! Rule audit log entry - append-only history of ComplianceRule state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::ComplianceRule;
use crate::value_objects::{AuditAction, RuleCategory, Severity, SourceType};

/// JSON snapshot of a rule row at a point in time
///
/// Snapshots are stored inline so history survives rule deletion without
/// live joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSnapshot {
    pub id: Uuid,
    pub state_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub citation: Option<String>,
    pub source_url: Option<String>,
    pub source_type: SourceType,
    pub product_types: Vec<String>,
    pub validation_prompt: Option<String>,
    pub is_active: bool,
    pub version: i32,
}

impl From<&ComplianceRule> for RuleSnapshot {
    fn from(rule: &ComplianceRule) -> Self {
        Self {
            id: rule.id,
            state_id: rule.state_id,
            name: rule.name.clone(),
            description: rule.description.clone(),
            category: rule.category,
            severity: rule.severity,
            citation: rule.citation.clone(),
            source_url: rule.source_url.clone(),
            source_type: rule.source_type,
            product_types: rule.product_types.clone(),
            validation_prompt: rule.validation_prompt.clone(),
            is_active: rule.is_active,
            version: rule.version,
        }
    }
}

/// Append-only audit record; never mutated or deleted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleAuditLogEntry {
    pub id: Uuid,
    pub rule_id: Option<Uuid>,
    pub state_id: Option<Uuid>,
    pub action: AuditAction,
    pub changed_by: Option<Uuid>,
    pub change_reason: Option<String>,
    pub previous_version: Option<RuleSnapshot>,
    pub new_version: Option<RuleSnapshot>,
    pub suggestion_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl RuleAuditLogEntry {
    pub fn new(id: Uuid, action: AuditAction) -> Self {
        Self {
            id,
            rule_id: None,
            state_id: None,
            action,
            changed_by: None,
            change_reason: None,
            previous_version: None,
            new_version: None,
            suggestion_id: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_rule() {
        let rule = ComplianceRule::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Net Weight".to_string(),
            "Net weight must appear on the front panel".to_string(),
            RuleCategory::Labeling,
            Severity::Warning,
            SourceType::Regulatory,
        );
        let snap = RuleSnapshot::from(&rule);
        assert_eq!(snap.id, rule.id);
        assert_eq!(snap.version, 1);

        // snapshots must serialize losslessly for JSONB storage
        let json = serde_json::to_value(&snap).unwrap();
        let back: RuleSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snap);
    }
}
