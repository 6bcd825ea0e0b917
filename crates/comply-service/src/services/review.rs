//! Suggestion review service
//!
//! Admin workflow for pending rule change suggestions. Approval applies the
//! proposed change to the rule set and records it in the audit log with the
//! originating suggestion linked; rejection is terminal and touches nothing
//! else.

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use comply_core::entities::{ComplianceRule, RuleAuditLogEntry, RuleChangeSuggestion, RuleSnapshot};
use comply_core::traits::SuggestionQuery;
use comply_core::value_objects::{
    AuditAction, ChangeType, RuleCategory, Severity, SourceType, SuggestionStatus,
};
use comply_core::DomainError;

use crate::dto::{ReviewSuggestionRequest, SuggestionResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::require_admin;

/// Suggestion review service
pub struct ReviewService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReviewService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List suggestions matching the query, newest first
    #[instrument(skip(self))]
    pub async fn list(&self, query: SuggestionQuery) -> ServiceResult<Vec<SuggestionResponse>> {
        let suggestions = self.ctx.suggestion_repo().find(query).await?;
        Ok(suggestions.iter().map(SuggestionResponse::from).collect())
    }

    /// Get a suggestion by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> ServiceResult<SuggestionResponse> {
        let suggestion = self.load(id).await?;
        Ok(SuggestionResponse::from(&suggestion))
    }

    /// Count of suggestions awaiting review, optionally scoped to a state
    #[instrument(skip(self))]
    pub async fn pending_count(&self, state_id: Option<Uuid>) -> ServiceResult<i64> {
        Ok(self.ctx.suggestion_repo().count_pending(state_id).await?)
    }

    /// Approve a pending suggestion and apply its change to the rule set
    #[instrument(skip(self, request))]
    pub async fn approve(
        &self,
        actor_id: Uuid,
        id: Uuid,
        request: ReviewSuggestionRequest,
    ) -> ServiceResult<SuggestionResponse> {
        require_admin(self.ctx, actor_id).await?;

        let mut suggestion = self.load(id).await?;
        Self::ensure_pending(&suggestion)?;

        // Reviewer notes become the audit reason; absent notes fall back to
        // the analyzer's own reasoning for the change
        let reason = request
            .notes
            .clone()
            .or_else(|| suggestion.ai_reasoning.clone());

        match suggestion.change_type {
            ChangeType::New => self.apply_new(actor_id, &suggestion, reason).await?,
            ChangeType::Update => self.apply_update(actor_id, &suggestion, reason).await?,
            ChangeType::Deprecate => self.apply_deprecate(actor_id, &suggestion, reason).await?,
        }

        suggestion.mark_reviewed(SuggestionStatus::Approved, actor_id, request.notes);
        self.ctx.suggestion_repo().update(&suggestion).await?;

        info!(suggestion_id = %id, change_type = %suggestion.change_type, "Suggestion approved");

        Ok(SuggestionResponse::from(&suggestion))
    }

    /// Reject a pending suggestion; terminal, no rule change happens
    #[instrument(skip(self, request))]
    pub async fn reject(
        &self,
        actor_id: Uuid,
        id: Uuid,
        request: ReviewSuggestionRequest,
    ) -> ServiceResult<SuggestionResponse> {
        require_admin(self.ctx, actor_id).await?;

        let mut suggestion = self.load(id).await?;
        Self::ensure_pending(&suggestion)?;

        suggestion.mark_reviewed(SuggestionStatus::Rejected, actor_id, request.notes);
        self.ctx.suggestion_repo().update(&suggestion).await?;

        info!(suggestion_id = %id, "Suggestion rejected");

        Ok(SuggestionResponse::from(&suggestion))
    }

    async fn load(&self, id: Uuid) -> ServiceResult<RuleChangeSuggestion> {
        self.ctx
            .suggestion_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Suggestion", id.to_string()))
    }

    fn ensure_pending(suggestion: &RuleChangeSuggestion) -> ServiceResult<()> {
        if suggestion.is_pending() {
            Ok(())
        } else {
            Err(DomainError::SuggestionAlreadyReviewed {
                status: suggestion.status,
            }
            .into())
        }
    }

    /// Create a new rule from an approved `new` suggestion
    async fn apply_new(
        &self,
        actor_id: Uuid,
        suggestion: &RuleChangeSuggestion,
        reason: Option<String>,
    ) -> ServiceResult<()> {
        let description = suggestion
            .suggested_description
            .clone()
            .ok_or_else(|| ServiceError::validation("Suggestion has no description"))?;

        let mut rule = ComplianceRule::new(
            Uuid::new_v4(),
            suggestion.state_id,
            suggestion.suggested_name.clone(),
            description,
            suggestion.suggested_category.unwrap_or(RuleCategory::Other),
            suggestion.suggested_severity.unwrap_or(Severity::Warning),
            SourceType::Regulatory,
        );
        rule.citation = suggestion.suggested_citation.clone();
        rule.source_url = suggestion.suggested_source_url.clone();

        self.ctx.rule_repo().create(&rule).await?;
        self.append_audit(
            &rule,
            AuditAction::Created,
            actor_id,
            reason,
            None,
            Some(RuleSnapshot::from(&rule)),
            suggestion.id,
        )
        .await?;

        info!(rule_id = %rule.id, "Rule created from suggestion");
        Ok(())
    }

    /// Overlay suggested fields onto the existing rule
    async fn apply_update(
        &self,
        actor_id: Uuid,
        suggestion: &RuleChangeSuggestion,
        reason: Option<String>,
    ) -> ServiceResult<()> {
        let mut rule = self.load_target_rule(suggestion).await?;
        let previous = RuleSnapshot::from(&rule);
        let expected_version = rule.version;

        rule.name = suggestion.suggested_name.clone();
        if let Some(description) = &suggestion.suggested_description {
            rule.description = description.clone();
        }
        if let Some(category) = suggestion.suggested_category {
            rule.category = category;
        }
        if let Some(severity) = suggestion.suggested_severity {
            rule.severity = severity;
        }
        if let Some(citation) = &suggestion.suggested_citation {
            rule.citation = Some(citation.clone());
        }
        if let Some(url) = &suggestion.suggested_source_url {
            rule.source_url = Some(url.clone());
        }
        rule.version = expected_version + 1;
        rule.updated_at = Utc::now();

        self.ctx
            .rule_repo()
            .update_with_version(&rule, expected_version)
            .await?;
        self.append_audit(
            &rule,
            AuditAction::Updated,
            actor_id,
            reason,
            Some(previous),
            Some(RuleSnapshot::from(&rule)),
            suggestion.id,
        )
        .await?;

        info!(rule_id = %rule.id, version = rule.version, "Rule updated from suggestion");
        Ok(())
    }

    /// Soft-delete the rule targeted by a `deprecate` suggestion
    async fn apply_deprecate(
        &self,
        actor_id: Uuid,
        suggestion: &RuleChangeSuggestion,
        reason: Option<String>,
    ) -> ServiceResult<()> {
        let rule = self.load_target_rule(suggestion).await?;
        let previous = RuleSnapshot::from(&rule);

        self.ctx.rule_repo().set_active(rule.id, false).await?;

        let mut deactivated = rule;
        deactivated.is_active = false;
        deactivated.version += 1;
        self.append_audit(
            &deactivated,
            AuditAction::Deactivated,
            actor_id,
            reason,
            Some(previous),
            Some(RuleSnapshot::from(&deactivated)),
            suggestion.id,
        )
        .await?;

        info!(rule_id = %deactivated.id, "Rule deprecated from suggestion");
        Ok(())
    }

    async fn load_target_rule(
        &self,
        suggestion: &RuleChangeSuggestion,
    ) -> ServiceResult<ComplianceRule> {
        let rule_id = suggestion
            .existing_rule_id
            .ok_or(DomainError::MissingExistingRule)?;

        Ok(self
            .ctx
            .rule_repo()
            .find_by_id(rule_id)
            .await?
            .ok_or(DomainError::RuleNotFound(rule_id))?)
    }

    async fn append_audit(
        &self,
        rule: &ComplianceRule,
        action: AuditAction,
        changed_by: Uuid,
        change_reason: Option<String>,
        previous: Option<RuleSnapshot>,
        new: Option<RuleSnapshot>,
        suggestion_id: Uuid,
    ) -> ServiceResult<()> {
        let mut entry = RuleAuditLogEntry::new(Uuid::new_v4(), action);
        entry.rule_id = Some(rule.id);
        entry.state_id = Some(rule.state_id);
        entry.changed_by = Some(changed_by);
        entry.change_reason = change_reason;
        entry.previous_version = previous;
        entry.new_version = new;
        entry.suggestion_id = Some(suggestion_id);

        self.ctx.audit_repo().append(&entry).await?;
        Ok(())
    }
}
