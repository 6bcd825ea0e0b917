//! # comply-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `comply-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - Repository implementations

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgAuditLogRepository, PgCheckRepository, PgPanelRepository, PgResultRepository,
    PgRuleRepository, PgSourceRepository, PgStateRepository, PgSuggestionRepository,
    PgUserRepository,
};
