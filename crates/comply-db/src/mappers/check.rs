//! Compliance check, panel upload, and check result mappers

use comply_core::{CheckResult, ComplianceCheck, DomainError, PanelUpload};

use super::bad_enum;
use crate::models::{CheckModel, CheckResultModel, PanelModel};

impl TryFrom<CheckModel> for ComplianceCheck {
    type Error = DomainError;

    fn try_from(model: CheckModel) -> Result<Self, Self::Error> {
        Ok(ComplianceCheck {
            id: model.id,
            owner_id: model.owner_id,
            state_id: model.state_id,
            product_type: model.product_type,
            status: model.status.parse().map_err(bad_enum)?,
            pass_count: model.pass_count,
            warning_count: model.warning_count,
            fail_count: model.fail_count,
            overall_status: model
                .overall_status
                .map(|s| s.parse().map_err(bad_enum))
                .transpose()?,
            error: model.error,
            created_at: model.created_at,
            completed_at: model.completed_at,
        })
    }
}

impl TryFrom<PanelModel> for PanelUpload {
    type Error = DomainError;

    fn try_from(model: PanelModel) -> Result<Self, Self::Error> {
        Ok(PanelUpload {
            id: model.id,
            check_id: model.check_id,
            panel_type: model.panel_type.parse().map_err(bad_enum)?,
            object_key: model.object_key,
            content_type: model.content_type,
            extraction: model.extraction,
            flagged_for_review: model.flagged_for_review,
            flag_reasons: model.flag_reasons,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<CheckResultModel> for CheckResult {
    type Error = DomainError;

    fn try_from(model: CheckResultModel) -> Result<Self, Self::Error> {
        Ok(CheckResult {
            id: model.id,
            check_id: model.check_id,
            rule_id: model.rule_id,
            rule_name: model.rule_name,
            status: model.status.parse().map_err(bad_enum)?,
            found_value: model.found_value,
            expected_value: model.expected_value,
            explanation: model.explanation,
            created_at: model.created_at,
        })
    }
}
