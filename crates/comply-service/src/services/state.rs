//! State management service

use tracing::{info, instrument};
use uuid::Uuid;

use comply_core::entities::State;

use crate::dto::{CreateStateRequest, StateResponse, UpdateStateRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::require_admin;

/// State management service
pub struct StateService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StateService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List active states
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<StateResponse>> {
        let states = self.ctx.state_repo().list_active().await?;
        Ok(states.iter().map(StateResponse::from).collect())
    }

    /// Get a state by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> ServiceResult<StateResponse> {
        let state = self
            .ctx
            .state_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("State", id.to_string()))?;

        Ok(StateResponse::from(&state))
    }

    /// Create a new state (admin only)
    #[instrument(skip(self, request), fields(code = %request.code))]
    pub async fn create(
        &self,
        actor_id: Uuid,
        request: CreateStateRequest,
    ) -> ServiceResult<StateResponse> {
        require_admin(self.ctx, actor_id).await?;

        if self
            .ctx
            .state_repo()
            .find_by_code(&request.code)
            .await?
            .is_some()
        {
            return Err(ServiceError::conflict(format!(
                "State {} already exists",
                request.code.to_uppercase()
            )));
        }

        let state = State::new(Uuid::new_v4(), request.code, request.name);
        self.ctx.state_repo().create(&state).await?;

        info!(state_id = %state.id, code = %state.code, "State created");

        Ok(StateResponse::from(&state))
    }

    /// Update a state (admin only)
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        actor_id: Uuid,
        id: Uuid,
        request: UpdateStateRequest,
    ) -> ServiceResult<StateResponse> {
        require_admin(self.ctx, actor_id).await?;

        let mut state = self
            .ctx
            .state_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("State", id.to_string()))?;

        if let Some(name) = request.name {
            state.name = name;
        }
        if let Some(is_active) = request.is_active {
            state.is_active = is_active;
        }

        self.ctx.state_repo().update(&state).await?;

        Ok(StateResponse::from(&state))
    }
}
