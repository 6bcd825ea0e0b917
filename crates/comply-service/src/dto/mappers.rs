//! Entity -> response DTO mappers

use comply_core::entities::{
    CheckResult, ComplianceCheck, ComplianceRule, PanelUpload, RegulatorySource,
    RuleAuditLogEntry, RuleChangeSuggestion, State, User,
};
use comply_core::value_objects::{resolve_citation, Jurisdiction};

use super::responses::{
    AuditEntryResponse, CheckResponse, CheckResultResponse, PanelResponse, RuleResponse,
    SourceResponse, StateResponse, SuggestionResponse, UserResponse,
};

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl From<&State> for StateResponse {
    fn from(state: &State) -> Self {
        Self {
            id: state.id,
            code: state.code.clone(),
            name: state.name.clone(),
            is_active: state.is_active,
        }
    }
}

impl From<&RegulatorySource> for SourceResponse {
    fn from(source: &RegulatorySource) -> Self {
        Self {
            id: source.id,
            state_id: source.state_id,
            source_name: source.source_name.clone(),
            source_url: source.source_url.clone(),
            content_hash: source.content_hash.clone(),
            last_checked: source.last_checked,
            last_content_change: source.last_content_change,
            check_frequency_days: source.check_frequency_days,
            is_active: source.is_active,
            created_at: source.created_at,
        }
    }
}

impl From<&ComplianceRule> for RuleResponse {
    fn from(rule: &ComplianceRule) -> Self {
        Self {
            id: rule.id,
            state_id: rule.state_id,
            name: rule.name.clone(),
            description: rule.description.clone(),
            category: rule.category,
            severity: rule.severity,
            citation: rule.citation.clone(),
            citation_link: None,
            source_url: rule.source_url.clone(),
            source_type: rule.source_type,
            product_types: rule.product_types.clone(),
            validation_prompt: rule.validation_prompt.clone(),
            is_active: rule.is_active,
            version: rule.version,
            created_at: rule.created_at,
            updated_at: rule.updated_at,
        }
    }
}

impl RuleResponse {
    /// Build the response with the citation resolved against a jurisdiction
    pub fn with_jurisdiction(rule: &ComplianceRule, jurisdiction: &Jurisdiction) -> Self {
        let mut response = Self::from(rule);
        response.citation_link = rule
            .citation
            .as_deref()
            .and_then(|c| resolve_citation(jurisdiction, c));
        response
    }
}

impl From<&RuleChangeSuggestion> for SuggestionResponse {
    fn from(s: &RuleChangeSuggestion) -> Self {
        Self {
            id: s.id,
            state_id: s.state_id,
            source_id: s.source_id,
            existing_rule_id: s.existing_rule_id,
            change_type: s.change_type,
            suggested_name: s.suggested_name.clone(),
            suggested_description: s.suggested_description.clone(),
            suggested_category: s.suggested_category,
            suggested_severity: s.suggested_severity,
            suggested_citation: s.suggested_citation.clone(),
            suggested_source_url: s.suggested_source_url.clone(),
            ai_reasoning: s.ai_reasoning.clone(),
            source_excerpt: s.source_excerpt.clone(),
            status: s.status,
            reviewed_by: s.reviewed_by,
            reviewed_at: s.reviewed_at,
            review_notes: s.review_notes.clone(),
            created_at: s.created_at,
        }
    }
}

impl From<&RuleAuditLogEntry> for AuditEntryResponse {
    fn from(entry: &RuleAuditLogEntry) -> Self {
        Self {
            id: entry.id,
            rule_id: entry.rule_id,
            state_id: entry.state_id,
            action: entry.action,
            changed_by: entry.changed_by,
            change_reason: entry.change_reason.clone(),
            previous_version: entry
                .previous_version
                .as_ref()
                .and_then(|s| serde_json::to_value(s).ok()),
            new_version: entry
                .new_version
                .as_ref()
                .and_then(|s| serde_json::to_value(s).ok()),
            suggestion_id: entry.suggestion_id,
            created_at: entry.created_at,
        }
    }
}

impl From<&ComplianceCheck> for CheckResponse {
    fn from(check: &ComplianceCheck) -> Self {
        Self {
            id: check.id,
            state_id: check.state_id,
            product_type: check.product_type.clone(),
            status: check.status,
            pass_count: check.pass_count,
            warning_count: check.warning_count,
            fail_count: check.fail_count,
            overall_status: check.overall_status,
            error: check.error.clone(),
            created_at: check.created_at,
            completed_at: check.completed_at,
        }
    }
}

impl From<&PanelUpload> for PanelResponse {
    fn from(panel: &PanelUpload) -> Self {
        Self {
            id: panel.id,
            check_id: panel.check_id,
            panel_type: panel.panel_type,
            content_type: panel.content_type.clone(),
            extraction: panel.extraction.clone(),
            flagged_for_review: panel.flagged_for_review,
            flag_reasons: panel.flag_reasons.clone(),
            created_at: panel.created_at,
        }
    }
}

impl From<&CheckResult> for CheckResultResponse {
    fn from(result: &CheckResult) -> Self {
        Self {
            id: result.id,
            rule_id: result.rule_id,
            rule_name: result.rule_name.clone(),
            status: result.status,
            found_value: result.found_value.clone(),
            expected_value: result.expected_value.clone(),
            explanation: result.explanation.clone(),
        }
    }
}
