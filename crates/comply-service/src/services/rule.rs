//! Compliance rule management service
//!
//! Direct admin edits to the rule set. Every mutation is version-guarded
//! and recorded in the append-only audit log with before/after snapshots.

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use comply_core::entities::{ComplianceRule, RuleAuditLogEntry, RuleSnapshot};
use comply_core::value_objects::{AuditAction, SourceType};

use crate::dto::{AuditEntryResponse, CreateRuleRequest, RuleResponse, UpdateRuleRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::require_admin;

/// Compliance rule management service
pub struct RuleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RuleService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List rules for a state, resolving citations against its jurisdiction
    #[instrument(skip(self))]
    pub async fn list_by_state(
        &self,
        state_id: Uuid,
        include_inactive: bool,
    ) -> ServiceResult<Vec<RuleResponse>> {
        let state = self
            .ctx
            .state_repo()
            .find_by_id(state_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("State", state_id.to_string()))?;
        let jurisdiction = state.jurisdiction();

        let rules = if include_inactive {
            self.ctx.rule_repo().find_by_state(state_id).await?
        } else {
            self.ctx.rule_repo().find_active_by_state(state_id).await?
        };

        Ok(rules
            .iter()
            .map(|r| RuleResponse::with_jurisdiction(r, &jurisdiction))
            .collect())
    }

    /// Get a rule by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> ServiceResult<RuleResponse> {
        let rule = self
            .ctx
            .rule_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Rule", id.to_string()))?;

        let jurisdiction = self
            .ctx
            .state_repo()
            .find_by_id(rule.state_id)
            .await?
            .map(|s| s.jurisdiction());

        Ok(match jurisdiction {
            Some(j) => RuleResponse::with_jurisdiction(&rule, &j),
            None => RuleResponse::from(&rule),
        })
    }

    /// Create a rule directly (admin only)
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        actor_id: Uuid,
        request: CreateRuleRequest,
    ) -> ServiceResult<RuleResponse> {
        require_admin(self.ctx, actor_id).await?;

        self.ctx
            .state_repo()
            .find_by_id(request.state_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("State", request.state_id.to_string()))?;

        let mut rule = ComplianceRule::new(
            Uuid::new_v4(),
            request.state_id,
            request.name,
            request.description,
            request.category,
            request.severity,
            SourceType::Internal,
        );
        rule.citation = request.citation;
        rule.source_url = request.source_url;
        rule.product_types = request.product_types;
        rule.validation_prompt = request.validation_prompt;

        self.ctx.rule_repo().create(&rule).await?;
        self.append_audit(
            &rule,
            AuditAction::Created,
            actor_id,
            request.reason,
            None,
            Some(RuleSnapshot::from(&rule)),
            None,
        )
        .await?;

        info!(rule_id = %rule.id, "Rule created by admin");

        Ok(RuleResponse::from(&rule))
    }

    /// Update a rule (admin only), guarded by the version the caller read
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        actor_id: Uuid,
        id: Uuid,
        request: UpdateRuleRequest,
    ) -> ServiceResult<RuleResponse> {
        require_admin(self.ctx, actor_id).await?;

        let mut rule = self
            .ctx
            .rule_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Rule", id.to_string()))?;
        let previous = RuleSnapshot::from(&rule);

        if let Some(name) = request.name {
            rule.name = name;
        }
        if let Some(description) = request.description {
            rule.description = description;
        }
        if let Some(category) = request.category {
            rule.category = category;
        }
        if let Some(severity) = request.severity {
            rule.severity = severity;
        }
        if let Some(citation) = request.citation {
            rule.citation = Some(citation);
        }
        if let Some(url) = request.source_url {
            rule.source_url = Some(url);
        }
        if let Some(product_types) = request.product_types {
            rule.product_types = product_types;
        }
        if let Some(prompt) = request.validation_prompt {
            rule.validation_prompt = Some(prompt);
        }
        rule.version = request.expected_version + 1;
        rule.updated_at = Utc::now();

        self.ctx
            .rule_repo()
            .update_with_version(&rule, request.expected_version)
            .await?;
        self.append_audit(
            &rule,
            AuditAction::Updated,
            actor_id,
            request.reason,
            Some(previous),
            Some(RuleSnapshot::from(&rule)),
            None,
        )
        .await?;

        info!(rule_id = %rule.id, version = rule.version, "Rule updated by admin");

        Ok(RuleResponse::from(&rule))
    }

    /// Activate or deactivate a rule (admin only)
    #[instrument(skip(self))]
    pub async fn set_active(
        &self,
        actor_id: Uuid,
        id: Uuid,
        is_active: bool,
        reason: Option<String>,
    ) -> ServiceResult<RuleResponse> {
        require_admin(self.ctx, actor_id).await?;

        let rule = self
            .ctx
            .rule_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Rule", id.to_string()))?;

        if rule.is_active == is_active {
            return Ok(RuleResponse::from(&rule));
        }
        let previous = RuleSnapshot::from(&rule);

        self.ctx.rule_repo().set_active(id, is_active).await?;

        let mut updated = rule;
        updated.is_active = is_active;
        updated.version += 1;
        let action = if is_active {
            AuditAction::Reactivated
        } else {
            AuditAction::Deactivated
        };
        self.append_audit(
            &updated,
            action,
            actor_id,
            reason,
            Some(previous),
            Some(RuleSnapshot::from(&updated)),
            None,
        )
        .await?;

        info!(rule_id = %id, is_active, "Rule activation changed");

        Ok(RuleResponse::from(&updated))
    }

    /// Audit history for a rule, newest first
    #[instrument(skip(self))]
    pub async fn history(&self, rule_id: Uuid) -> ServiceResult<Vec<AuditEntryResponse>> {
        let entries = self.ctx.audit_repo().find_by_rule(rule_id).await?;
        Ok(entries.iter().map(AuditEntryResponse::from).collect())
    }

    /// Recent audit entries across all rules (admin dashboard)
    #[instrument(skip(self))]
    pub async fn recent_history(&self, limit: i64) -> ServiceResult<Vec<AuditEntryResponse>> {
        let entries = self.ctx.audit_repo().find_recent(limit.clamp(1, 200)).await?;
        Ok(entries.iter().map(AuditEntryResponse::from).collect())
    }

    #[allow(clippy::too_many_arguments)]
    async fn append_audit(
        &self,
        rule: &ComplianceRule,
        action: AuditAction,
        changed_by: Uuid,
        reason: Option<String>,
        previous: Option<RuleSnapshot>,
        new: Option<RuleSnapshot>,
        suggestion_id: Option<Uuid>,
    ) -> ServiceResult<()> {
        let mut entry = RuleAuditLogEntry::new(Uuid::new_v4(), action);
        entry.rule_id = Some(rule.id);
        entry.state_id = Some(rule.state_id);
        entry.changed_by = Some(changed_by);
        entry.change_reason = reason;
        entry.previous_version = previous;
        entry.new_version = new;
        entry.suggestion_id = suggestion_id;

        self.ctx.audit_repo().append(&entry).await?;
        Ok(())
    }
}
