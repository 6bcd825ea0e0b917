//! Compliance rule handlers
//!
//! Endpoints for rule CRUD, activation, and the append-only audit history.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use comply_service::dto::{
    AuditEntryResponse, CreateRuleRequest, RuleResponse, UpdateRuleRequest,
};
use comply_service::services::RuleService;
use serde::Deserialize;
use uuid::Uuid;

use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Query parameters for listing rules
#[derive(Debug, Default, Deserialize)]
pub struct RuleListParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// List the rules for a state
///
/// GET /states/:state_id/rules
pub async fn list_state_rules(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(state_id): Path<Uuid>,
    Query(params): Query<RuleListParams>,
) -> ApiResult<Json<Vec<RuleResponse>>> {
    let service = RuleService::new(state.service_context());
    let response = service
        .list_by_state(state_id, params.include_inactive)
        .await?;
    Ok(Json(response))
}

/// Get a rule by ID
///
/// GET /rules/:rule_id
pub async fn get_rule(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(rule_id): Path<Uuid>,
) -> ApiResult<Json<RuleResponse>> {
    let service = RuleService::new(state.service_context());
    let response = service.get(rule_id).await?;
    Ok(Json(response))
}

/// Create a rule directly (admin only)
///
/// POST /rules
pub async fn create_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRuleRequest>,
) -> ApiResult<Created<Json<RuleResponse>>> {
    let service = RuleService::new(state.service_context());
    let response = service.create(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Update a rule with optimistic version check (admin only)
///
/// PATCH /rules/:rule_id
pub async fn update_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(rule_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateRuleRequest>,
) -> ApiResult<Json<RuleResponse>> {
    let service = RuleService::new(state.service_context());
    let response = service.update(auth.user_id, rule_id, request).await?;
    Ok(Json(response))
}

/// Optional body for activation changes
#[derive(Debug, Default, serde::Deserialize)]
pub struct ActivationBody {
    pub reason: Option<String>,
}

/// Reactivate a rule (admin only)
///
/// POST /rules/:rule_id/activate
pub async fn activate_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(rule_id): Path<Uuid>,
    body: Option<Json<ActivationBody>>,
) -> ApiResult<Json<RuleResponse>> {
    let reason = body.and_then(|b| b.0.reason);
    let service = RuleService::new(state.service_context());
    let response = service.set_active(auth.user_id, rule_id, true, reason).await?;
    Ok(Json(response))
}

/// Deactivate a rule (admin only)
///
/// POST /rules/:rule_id/deactivate
pub async fn deactivate_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(rule_id): Path<Uuid>,
    body: Option<Json<ActivationBody>>,
) -> ApiResult<Json<RuleResponse>> {
    let reason = body.and_then(|b| b.0.reason);
    let service = RuleService::new(state.service_context());
    let response = service
        .set_active(auth.user_id, rule_id, false, reason)
        .await?;
    Ok(Json(response))
}

/// Audit history for a rule, newest first
///
/// GET /rules/:rule_id/history
pub async fn rule_history(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(rule_id): Path<Uuid>,
) -> ApiResult<Json<Vec<AuditEntryResponse>>> {
    let service = RuleService::new(state.service_context());
    let response = service.history(rule_id).await?;
    Ok(Json(response))
}

/// Recent audit entries across all rules
///
/// GET /audit/recent
pub async fn recent_audit(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Vec<AuditEntryResponse>>> {
    let service = RuleService::new(state.service_context());
    let response = service.recent_history(params.limit()).await?;
    Ok(Json(response))
}
