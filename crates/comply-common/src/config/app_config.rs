//! Application configuration structs
//!
//! Loads configuration from environment variables.

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub scheduler: SchedulerConfig,
    pub providers: ProvidersConfig,
    pub analysis: AnalysisConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Label image storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: u32,
}

/// Background source-check scheduler configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_scheduler_enabled")]
    pub enabled: bool,
    #[serde(default = "default_scheduler_interval_hours")]
    pub interval_hours: u64,
}

/// A single outbound AI provider endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

/// Outbound provider endpoints for scraping, reasoning, vision, and search
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    pub scrape: ProviderConfig,
    pub reasoning: ProviderConfig,
    pub vision: ProviderConfig,
    pub search: ProviderConfig,
}

/// Knobs for the regulatory diff analyzer and label scoring
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Character budget for scraped content sent to the reasoning model
    #[serde(default = "default_content_char_budget")]
    pub content_char_budget: usize,
    /// Extractions below this confidence are flagged for human review
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

// Default value functions
fn default_app_name() -> String {
    "labelproof".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_access_token_expiry() -> i64 {
    3600 // 1 hour
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_max_file_size() -> u32 {
    10
}

fn default_scheduler_enabled() -> bool {
    true
}

fn default_scheduler_interval_hours() -> u64 {
    24
}

fn default_content_char_budget() -> usize {
    48_000
}

fn default_confidence_threshold() -> f64 {
    0.85
}

fn default_retry_max_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1_000
}

fn provider_from_env(prefix: &str) -> Result<ProviderConfig, ConfigError> {
    let base_url = env::var(format!("{prefix}_BASE_URL"))
        .map_err(|_| ConfigError::MissingProviderVar(prefix.to_string()))?;

    Ok(ProviderConfig {
        base_url,
        api_key: env::var(format!("{prefix}_API_KEY")).ok(),
        model: env::var(format!("{prefix}_MODEL")).ok(),
    })
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: env::var("API_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?,
                access_token_expiry: env::var("JWT_ACCESS_TOKEN_EXPIRY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_access_token_expiry),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: env::var("RATE_LIMIT_REQUESTS_PER_SECOND")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_requests_per_second),
                burst: env::var("RATE_LIMIT_BURST")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| default_upload_dir()),
                max_file_size_mb: env::var("MAX_FILE_SIZE_MB")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_file_size),
            },
            scheduler: SchedulerConfig {
                enabled: env::var("SCHEDULER_ENABLED")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_scheduler_enabled),
                interval_hours: env::var("SCHEDULER_INTERVAL_HOURS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_scheduler_interval_hours),
            },
            providers: ProvidersConfig {
                scrape: provider_from_env("SCRAPE_PROVIDER")?,
                reasoning: provider_from_env("REASONING_PROVIDER")?,
                vision: provider_from_env("VISION_PROVIDER")?,
                search: provider_from_env("SEARCH_PROVIDER")?,
            },
            analysis: AnalysisConfig {
                content_char_budget: env::var("ANALYSIS_CONTENT_CHAR_BUDGET")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_content_char_budget),
                confidence_threshold: env::var("ANALYSIS_CONFIDENCE_THRESHOLD")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_confidence_threshold),
                retry_max_attempts: env::var("ANALYSIS_RETRY_MAX_ATTEMPTS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_retry_max_attempts),
                retry_base_delay_ms: env::var("ANALYSIS_RETRY_BASE_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_retry_base_delay_ms),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Missing provider configuration: {0}_BASE_URL")]
    MissingProviderVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_name(), "labelproof");
        assert_eq!(default_host(), "127.0.0.1");
        assert_eq!(default_max_connections(), 20);
        assert_eq!(default_scheduler_interval_hours(), 24);
        assert!((default_confidence_threshold() - 0.85).abs() < f64::EPSILON);
    }
}
