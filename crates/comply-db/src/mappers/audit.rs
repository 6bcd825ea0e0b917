//! Rule audit log entry entity <-> model mapper

use comply_core::{DomainError, RuleAuditLogEntry, RuleSnapshot};
use serde_json::Value as JsonValue;

use super::bad_enum;
use crate::models::AuditLogModel;

fn parse_snapshot(value: Option<JsonValue>) -> Result<Option<RuleSnapshot>, DomainError> {
    value
        .map(|v| {
            serde_json::from_value(v)
                .map_err(|e| DomainError::InternalError(format!("corrupt rule snapshot: {e}")))
        })
        .transpose()
}

impl TryFrom<AuditLogModel> for RuleAuditLogEntry {
    type Error = DomainError;

    fn try_from(model: AuditLogModel) -> Result<Self, Self::Error> {
        Ok(RuleAuditLogEntry {
            id: model.id,
            rule_id: model.rule_id,
            state_id: model.state_id,
            action: model.action.parse().map_err(bad_enum)?,
            changed_by: model.changed_by,
            change_reason: model.change_reason,
            previous_version: parse_snapshot(model.previous_version)?,
            new_version: parse_snapshot(model.new_version)?,
            suggestion_id: model.suggestion_id,
            created_at: model.created_at,
        })
    }
}
