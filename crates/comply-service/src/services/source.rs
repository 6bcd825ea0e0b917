//! Regulatory source management service

use tracing::{info, instrument};
use uuid::Uuid;

use comply_core::entities::RegulatorySource;

use crate::dto::{CreateSourceRequest, SourceResponse, UpdateSourceRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::require_admin;

const DEFAULT_CHECK_FREQUENCY_DAYS: i32 = 7;

/// Regulatory source management service
pub struct SourceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SourceService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List sources for a state
    #[instrument(skip(self))]
    pub async fn list_by_state(&self, state_id: Uuid) -> ServiceResult<Vec<SourceResponse>> {
        let sources = self.ctx.source_repo().find_by_state(state_id).await?;
        Ok(sources.iter().map(SourceResponse::from).collect())
    }

    /// Get a source by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> ServiceResult<SourceResponse> {
        let source = self
            .ctx
            .source_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Source", id.to_string()))?;

        Ok(SourceResponse::from(&source))
    }

    /// Register a new government page for monitoring (admin only)
    #[instrument(skip(self, request), fields(url = %request.source_url))]
    pub async fn create(
        &self,
        actor_id: Uuid,
        request: CreateSourceRequest,
    ) -> ServiceResult<SourceResponse> {
        require_admin(self.ctx, actor_id).await?;

        // The state must exist before we start monitoring pages for it
        self.ctx
            .state_repo()
            .find_by_id(request.state_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("State", request.state_id.to_string()))?;

        let source = RegulatorySource::new(
            Uuid::new_v4(),
            request.state_id,
            request.source_name,
            request.source_url,
            request
                .check_frequency_days
                .unwrap_or(DEFAULT_CHECK_FREQUENCY_DAYS),
        );
        self.ctx.source_repo().create(&source).await?;

        info!(source_id = %source.id, "Regulatory source registered");

        Ok(SourceResponse::from(&source))
    }

    /// Update a source (admin only)
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        actor_id: Uuid,
        id: Uuid,
        request: UpdateSourceRequest,
    ) -> ServiceResult<SourceResponse> {
        require_admin(self.ctx, actor_id).await?;

        let mut source = self
            .ctx
            .source_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Source", id.to_string()))?;

        if let Some(name) = request.source_name {
            source.source_name = name;
        }
        if let Some(url) = request.source_url {
            source.source_url = url;
        }
        if let Some(days) = request.check_frequency_days {
            source.check_frequency_days = days;
        }
        if let Some(is_active) = request.is_active {
            source.is_active = is_active;
        }

        self.ctx.source_repo().update(&source).await?;

        Ok(SourceResponse::from(&source))
    }

    /// Deactivate a source (admin only)
    #[instrument(skip(self))]
    pub async fn delete(&self, actor_id: Uuid, id: Uuid) -> ServiceResult<()> {
        require_admin(self.ctx, actor_id).await?;

        self.ctx.source_repo().delete(id).await?;

        info!(source_id = %id, "Regulatory source deactivated");

        Ok(())
    }
}
