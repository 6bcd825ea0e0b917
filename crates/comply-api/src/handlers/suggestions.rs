//! Suggestion review handlers
//!
//! Endpoints for listing and reviewing rule change suggestions produced by
//! the source monitoring pipeline.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use comply_core::traits::SuggestionQuery;
use comply_core::value_objects::SuggestionStatus;
use comply_service::dto::{ReviewSuggestionRequest, SuggestionResponse};
use comply_service::services::ReviewService;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extractors::{AuthUser, OptionalValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for listing suggestions
#[derive(Debug, Default, Deserialize)]
pub struct SuggestionListParams {
    pub state_id: Option<Uuid>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SuggestionListParams {
    fn into_query(self) -> Result<SuggestionQuery, ApiError> {
        let status = self
            .status
            .as_deref()
            .map(SuggestionStatus::from_str)
            .transpose()
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Ok(SuggestionQuery {
            state_id: self.state_id,
            status,
            limit: self.limit.unwrap_or(50).clamp(1, 100),
            offset: self.offset.unwrap_or(0).max(0),
        })
    }
}

/// List suggestions, newest first
///
/// GET /suggestions
pub async fn list_suggestions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<SuggestionListParams>,
) -> ApiResult<Json<Vec<SuggestionResponse>>> {
    let query = params.into_query()?;
    let service = ReviewService::new(state.service_context());
    let response = service.list(query).await?;
    Ok(Json(response))
}

/// Pending count response body
#[derive(Debug, Serialize)]
pub struct PendingCountResponse {
    pub count: i64,
}

/// Query parameters for the pending count
#[derive(Debug, Default, Deserialize)]
pub struct PendingCountParams {
    pub state_id: Option<Uuid>,
}

/// Count of suggestions awaiting review
///
/// GET /suggestions/pending/count
pub async fn pending_count(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PendingCountParams>,
) -> ApiResult<Json<PendingCountResponse>> {
    let service = ReviewService::new(state.service_context());
    let count = service.pending_count(params.state_id).await?;
    Ok(Json(PendingCountResponse { count }))
}

/// Get a suggestion by ID
///
/// GET /suggestions/:suggestion_id
pub async fn get_suggestion(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(suggestion_id): Path<Uuid>,
) -> ApiResult<Json<SuggestionResponse>> {
    let service = ReviewService::new(state.service_context());
    let response = service.get(suggestion_id).await?;
    Ok(Json(response))
}

/// Approve a pending suggestion and apply its change (admin only)
///
/// POST /suggestions/:suggestion_id/approve
pub async fn approve_suggestion(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(suggestion_id): Path<Uuid>,
    OptionalValidatedJson(body): OptionalValidatedJson<ReviewSuggestionRequest>,
) -> ApiResult<Json<SuggestionResponse>> {
    let request = body.unwrap_or_default();
    let service = ReviewService::new(state.service_context());
    let response = service
        .approve(auth.user_id, suggestion_id, request)
        .await?;
    Ok(Json(response))
}

/// Reject a pending suggestion (admin only)
///
/// POST /suggestions/:suggestion_id/reject
pub async fn reject_suggestion(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(suggestion_id): Path<Uuid>,
    OptionalValidatedJson(body): OptionalValidatedJson<ReviewSuggestionRequest>,
) -> ApiResult<Json<SuggestionResponse>> {
    let request = body.unwrap_or_default();
    let service = ReviewService::new(state.service_context());
    let response = service.reject(auth.user_id, suggestion_id, request).await?;
    Ok(Json(response))
}
