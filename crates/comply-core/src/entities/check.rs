//! Compliance check session, panel uploads, and per-rule results

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::value_objects::{CheckStatus, PanelType, ResultStatus};

/// A label compliance check session owning 1..N panel uploads and N results
///
/// Invariant once complete: `pass_count + warning_count + fail_count` equals
/// the number of results, and `overall_status` is fail if any fail, else
/// warning if any warning, else pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceCheck {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub state_id: Uuid,
    pub product_type: String,
    pub status: CheckStatus,
    pub pass_count: i32,
    pub warning_count: i32,
    pub fail_count: i32,
    pub overall_status: Option<ResultStatus>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ComplianceCheck {
    pub fn new(id: Uuid, owner_id: Uuid, state_id: Uuid, product_type: String) -> Self {
        Self {
            id,
            owner_id,
            state_id,
            product_type,
            status: CheckStatus::Pending,
            pass_count: 0,
            warning_count: 0,
            fail_count: 0,
            overall_status: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Derive the overall status from per-rule statuses; fail dominates
    /// warning dominates pass
    pub fn overall_from_statuses(statuses: &[ResultStatus]) -> ResultStatus {
        if statuses.contains(&ResultStatus::Fail) {
            ResultStatus::Fail
        } else if statuses.contains(&ResultStatus::Warning) {
            ResultStatus::Warning
        } else {
            ResultStatus::Pass
        }
    }

    /// Apply scoring outcome and complete the check
    pub fn complete(&mut self, statuses: &[ResultStatus]) {
        self.pass_count = statuses.iter().filter(|s| **s == ResultStatus::Pass).count() as i32;
        self.warning_count = statuses
            .iter()
            .filter(|s| **s == ResultStatus::Warning)
            .count() as i32;
        self.fail_count = statuses.iter().filter(|s| **s == ResultStatus::Fail).count() as i32;
        self.overall_status = Some(Self::overall_from_statuses(statuses));
        self.status = CheckStatus::Complete;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the check failed (fatal scoring error)
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = CheckStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
    }
}

/// One uploaded label panel image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelUpload {
    pub id: Uuid,
    pub check_id: Uuid,
    pub panel_type: PanelType,
    /// Object-store key: `{owner_id}/{check_id}/{panel_id}`
    pub object_key: String,
    pub content_type: String,
    /// Structured extraction returned by the vision model
    pub extraction: Option<JsonValue>,
    pub flagged_for_review: bool,
    pub flag_reasons: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl PanelUpload {
    pub fn new(
        id: Uuid,
        check_id: Uuid,
        panel_type: PanelType,
        object_key: String,
        content_type: String,
    ) -> Self {
        Self {
            id,
            check_id,
            panel_type,
            object_key,
            content_type,
            extraction: None,
            flagged_for_review: false,
            flag_reasons: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Per-rule scoring record for a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub id: Uuid,
    pub check_id: Uuid,
    pub rule_id: Uuid,
    pub rule_name: String,
    pub status: ResultStatus,
    pub found_value: Option<String>,
    pub expected_value: Option<String>,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
}
