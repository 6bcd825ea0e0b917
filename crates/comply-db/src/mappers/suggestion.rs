//! Rule change suggestion entity <-> model mapper

use comply_core::{DomainError, RuleChangeSuggestion};

use super::bad_enum;
use crate::models::SuggestionModel;

impl TryFrom<SuggestionModel> for RuleChangeSuggestion {
    type Error = DomainError;

    fn try_from(model: SuggestionModel) -> Result<Self, Self::Error> {
        Ok(RuleChangeSuggestion {
            id: model.id,
            state_id: model.state_id,
            source_id: model.source_id,
            existing_rule_id: model.existing_rule_id,
            change_type: model.change_type.parse().map_err(bad_enum)?,
            suggested_name: model.suggested_name,
            suggested_description: model.suggested_description,
            suggested_category: model
                .suggested_category
                .map(|c| c.parse().map_err(bad_enum))
                .transpose()?,
            suggested_severity: model
                .suggested_severity
                .map(|s| s.parse().map_err(bad_enum))
                .transpose()?,
            suggested_citation: model.suggested_citation,
            suggested_source_url: model.suggested_source_url,
            ai_reasoning: model.ai_reasoning,
            source_excerpt: model.source_excerpt,
            status: model.status.parse().map_err(bad_enum)?,
            reviewed_by: model.reviewed_by,
            reviewed_at: model.reviewed_at,
            review_notes: model.review_notes,
            created_at: model.created_at,
        })
    }
}
