//! # comply-common
//!
//! Shared utilities including configuration, error handling, authentication,
//! object storage, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{hash_password, verify_password, Claims, JwtService, PasswordService};
pub use config::{
    AnalysisConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    JwtConfig, ProviderConfig, ProvidersConfig, RateLimitConfig, SchedulerConfig, ServerConfig,
    StorageConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use storage::{FsObjectStore, ObjectStore};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
