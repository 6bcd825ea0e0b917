//! Regulatory source handlers
//!
//! Endpoints for managing monitored government pages and for triggering
//! on-demand checks against them.

use axum::{
    extract::{Path, State},
    Json,
};
use comply_service::dto::{
    CreateSourceRequest, RunChecksRequest, SourceResponse, UpdateSourceRequest,
};
use comply_service::services::{
    SourceCheckOutcome, SourceCheckService, SourceCheckSummary, SourceService,
};
use uuid::Uuid;

use crate::extractors::{AuthUser, OptionalValidatedJson, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List the sources monitored for a state
///
/// GET /states/:state_id/sources
pub async fn list_state_sources(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(state_id): Path<Uuid>,
) -> ApiResult<Json<Vec<SourceResponse>>> {
    let service = SourceService::new(state.service_context());
    let response = service.list_by_state(state_id).await?;
    Ok(Json(response))
}

/// Get a source by ID
///
/// GET /sources/:source_id
pub async fn get_source(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(source_id): Path<Uuid>,
) -> ApiResult<Json<SourceResponse>> {
    let service = SourceService::new(state.service_context());
    let response = service.get(source_id).await?;
    Ok(Json(response))
}

/// Register a new government page for monitoring (admin only)
///
/// POST /sources
pub async fn create_source(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateSourceRequest>,
) -> ApiResult<Created<Json<SourceResponse>>> {
    let service = SourceService::new(state.service_context());
    let response = service.create(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Update a source (admin only)
///
/// PATCH /sources/:source_id
pub async fn update_source(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(source_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateSourceRequest>,
) -> ApiResult<Json<SourceResponse>> {
    let service = SourceService::new(state.service_context());
    let response = service.update(auth.user_id, source_id, request).await?;
    Ok(Json(response))
}

/// Stop monitoring a source (admin only)
///
/// DELETE /sources/:source_id
pub async fn delete_source(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(source_id): Path<Uuid>,
) -> ApiResult<NoContent> {
    let service = SourceService::new(state.service_context());
    service.delete(auth.user_id, source_id).await?;
    Ok(NoContent)
}

/// Run source checks without waiting for the scheduler (admin only)
///
/// The optional body scopes the run to a state or a single source and can
/// force re-analysis of unchanged content.
///
/// POST /sources/check
pub async fn run_source_checks(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalValidatedJson(request): OptionalValidatedJson<RunChecksRequest>,
) -> ApiResult<Json<SourceCheckSummary>> {
    let service = SourceCheckService::new(state.service_context());
    let summary = service
        .run_checks(auth.user_id, request.unwrap_or_default())
        .await?;
    Ok(Json(summary))
}

/// Check a source immediately, ignoring its schedule (admin only)
///
/// POST /sources/:source_id/check
pub async fn check_source(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(source_id): Path<Uuid>,
) -> ApiResult<Json<SourceCheckOutcome>> {
    let service = SourceCheckService::new(state.service_context());
    let outcome = service.check_source(auth.user_id, source_id).await?;
    Ok(Json(outcome))
}
