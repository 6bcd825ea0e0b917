//! Authentication service
//!
//! Handles user registration, login, and profile lookup.

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use comply_common::AppError;
use comply_core::entities::User;
use comply_core::value_objects::UserRole;

use crate::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    ///
    /// New accounts always get the member role; admins are provisioned
    /// out of band.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(ServiceError::conflict("Email already registered"));
        }

        let password_hash = self.ctx.password_service().hash(&request.password)?;

        let user = User {
            id: Uuid::new_v4(),
            email: request.email,
            display_name: request.display_name,
            role: UserRole::Member,
            is_active: true,
            created_at: Utc::now(),
        };

        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User registered successfully");

        self.token_response(&user)
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: user not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        self.ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
            .map_err(|e| {
                warn!(user_id = %user.id, "Login failed: invalid password");
                ServiceError::App(e)
            })?;

        info!(user_id = %user.id, "User logged in successfully");

        self.token_response(&user)
    }

    /// Fetch the current user's profile
    #[instrument(skip(self))]
    pub async fn current_user(&self, user_id: Uuid) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        Ok(UserResponse::from(&user))
    }

    fn token_response(&self, user: &User) -> ServiceResult<AuthResponse> {
        let access_token = self
            .ctx
            .jwt_service()
            .generate_access_token(user.id, user.role)?;

        Ok(AuthResponse::new(
            access_token,
            self.ctx.jwt_service().access_token_expiry(),
            UserResponse::from(user),
        ))
    }
}
