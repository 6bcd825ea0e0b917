//! Authentication handlers
//!
//! Endpoints for user registration, login, and the current user profile.

use axum::{extract::State, Json};
use comply_service::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use comply_service::services::AuthService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Register a new user
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Get the authenticated user's profile
///
/// GET /auth/me
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.current_user(auth.user_id).await?;
    Ok(Json(response))
}
