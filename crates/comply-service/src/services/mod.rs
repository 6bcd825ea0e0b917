//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod auth;
pub mod check;
pub mod context;
pub mod error;
pub mod report;
pub mod review;
pub mod rule;
pub mod source;
pub mod source_check;
pub mod state;

// Re-export all services for convenience
pub use auth::AuthService;
pub use check::CheckService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use report::ReportService;
pub use review::ReviewService;
pub use rule::RuleService;
pub use source::SourceService;
pub use source_check::{SourceCheckOutcome, SourceCheckService, SourceCheckSummary};
pub use state::StateService;

use comply_core::entities::User;
use uuid::Uuid;

/// Load the acting user and require the admin role
pub(crate) async fn require_admin(ctx: &ServiceContext, user_id: Uuid) -> ServiceResult<User> {
    let user = ctx
        .user_repo()
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

    if !user.is_admin() {
        return Err(ServiceError::AdminRequired);
    }

    Ok(user)
}
