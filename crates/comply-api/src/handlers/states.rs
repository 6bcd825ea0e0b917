//! State handlers
//!
//! Endpoints for the jurisdictions the platform supports.

use axum::{
    extract::{Path, State},
    Json,
};
use comply_service::dto::{CreateStateRequest, StateResponse, UpdateStateRequest};
use comply_service::services::StateService;
use uuid::Uuid;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List active states
///
/// GET /states
pub async fn list_states(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<StateResponse>>> {
    let service = StateService::new(state.service_context());
    let response = service.list().await?;
    Ok(Json(response))
}

/// Get a state by ID
///
/// GET /states/:state_id
pub async fn get_state(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(state_id): Path<Uuid>,
) -> ApiResult<Json<StateResponse>> {
    let service = StateService::new(state.service_context());
    let response = service.get(state_id).await?;
    Ok(Json(response))
}

/// Create a new state (admin only)
///
/// POST /states
pub async fn create_state(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateStateRequest>,
) -> ApiResult<Created<Json<StateResponse>>> {
    let service = StateService::new(state.service_context());
    let response = service.create(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Update a state (admin only)
///
/// PATCH /states/:state_id
pub async fn update_state(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(state_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateStateRequest>,
) -> ApiResult<Json<StateResponse>> {
    let service = StateService::new(state.service_context());
    let response = service.update(auth.user_id, state_id, request).await?;
    Ok(Json(response))
}
