//! Compliance rule entity <-> model mapper

use comply_core::{ComplianceRule, DomainError};

use super::bad_enum;
use crate::models::RuleModel;

impl TryFrom<RuleModel> for ComplianceRule {
    type Error = DomainError;

    fn try_from(model: RuleModel) -> Result<Self, Self::Error> {
        Ok(ComplianceRule {
            id: model.id,
            state_id: model.state_id,
            name: model.name,
            description: model.description,
            category: model.category.parse().map_err(bad_enum)?,
            severity: model.severity.parse().map_err(bad_enum)?,
            citation: model.citation,
            source_url: model.source_url,
            source_type: model.source_type.parse().map_err(bad_enum)?,
            product_types: model.product_types,
            validation_prompt: model.validation_prompt,
            is_active: model.is_active,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
