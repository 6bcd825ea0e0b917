//! Configuration loading

mod app_config;

pub use app_config::{
    AnalysisConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    JwtConfig, ProviderConfig, ProvidersConfig, RateLimitConfig, SchedulerConfig, ServerConfig,
    StorageConfig,
};
