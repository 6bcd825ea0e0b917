//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, making HTTP requests,
//! and managing test data.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use comply_api::{create_app, create_app_state};
use comply_common::{
    AnalysisConfig, AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    ProviderConfig, ProvidersConfig, RateLimitConfig, SchedulerConfig, ServerConfig, StorageConfig,
};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        // Bind to an OS-assigned port to avoid collisions across tests
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));

        // Create app state
        let state = create_app_state(config).await?;

        // Build application
        let app = create_app(state);

        // Bind to port
        let listener = TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Create HTTP client
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr: actual_addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await?)
    }

    /// Make a bodyless POST request with auth token
    pub async fn post_auth_empty(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?)
    }

    /// Upload a panel image as multipart form data
    pub async fn post_panel(
        &self,
        path: &str,
        token: &str,
        panel_type: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("panel.png")
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new()
            .text("panel_type", panel_type.to_string())
            .part("image", part);

        Ok(self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await?)
    }

    /// Make a PATCH request with auth token
    pub async fn patch_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .patch(&url)
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .delete(&url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?)
    }
}

/// Create a test configuration
///
/// Only DATABASE_URL comes from the environment; everything else uses test
/// defaults so the suite never depends on live provider endpoints.
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set for integration tests"))?;

    Ok(AppConfig {
        app: AppSettings {
            name: "labelproof-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: database_url,
            max_connections: 5,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret-key-that-is-long-enough".to_string(),
            access_token_expiry: 3600,
        },
        rate_limit: RateLimitConfig {
            // High enough that the suite never trips the limiter
            requests_per_second: 1000,
            burst: 1000,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
        storage: StorageConfig {
            upload_dir: std::env::temp_dir()
                .join("labelproof-integration-uploads")
                .to_string_lossy()
                .into_owned(),
            max_file_size_mb: 10,
        },
        scheduler: SchedulerConfig {
            enabled: false,
            interval_hours: 24,
        },
        providers: ProvidersConfig {
            scrape: test_provider(),
            reasoning: test_provider(),
            vision: test_provider(),
            search: test_provider(),
        },
        analysis: AnalysisConfig {
            content_char_budget: 48_000,
            confidence_threshold: 0.85,
            retry_max_attempts: 1,
            retry_base_delay_ms: 10,
        },
    })
}

/// A provider config pointing nowhere; tests never exercise live providers
fn test_provider() -> ProviderConfig {
    ProviderConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: Some("test-key".to_string()),
        model: Some("test-model".to_string()),
    }
}

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    true
}

/// Promote a registered user to admin directly in the database
///
/// Registration always creates members; admin accounts are provisioned out
/// of band, which in tests means flipping the role here.
pub async fn promote_to_admin(email: &str) -> Result<()> {
    let config = test_config()?;
    let db_config = comply_db::DatabaseConfig {
        url: config.database.url,
        max_connections: 2,
        min_connections: 1,
        ..Default::default()
    };
    let pool = comply_db::create_pool(&db_config).await?;

    sqlx::query("UPDATE users SET role = 'admin' WHERE email = $1")
        .bind(email)
        .execute(&pool)
        .await?;

    Ok(())
}

/// Insert a pending rule change suggestion directly in the database
///
/// Suggestions normally come out of the source check pipeline, which needs
/// live AI providers; tests seed them here instead.
pub async fn seed_suggestion(
    state_id: uuid::Uuid,
    change_type: &str,
    existing_rule_id: Option<uuid::Uuid>,
) -> Result<uuid::Uuid> {
    let config = test_config()?;
    let db_config = comply_db::DatabaseConfig {
        url: config.database.url,
        max_connections: 2,
        min_connections: 1,
        ..Default::default()
    };
    let pool = comply_db::create_pool(&db_config).await?;

    let id = uuid::Uuid::new_v4();
    sqlx::query(
        "INSERT INTO rule_change_suggestions \
         (id, state_id, existing_rule_id, change_type, suggested_name, \
          suggested_description, suggested_category, suggested_severity, \
          suggested_citation, ai_reasoning, source_excerpt, status) \
         VALUES ($1, $2, $3, $4, $5, $6, 'warnings', 'error', $7, $8, $9, 'pending')",
    )
    .bind(id)
    .bind(state_id)
    .bind(existing_rule_id)
    .bind(change_type)
    .bind(format!("Seeded suggestion {id}"))
    .bind("Labels must carry the seeded warning statement")
    .bind("ARM 37.107.402")
    .bind("The page now requires this warning")
    .bind("verbatim excerpt from the page")
    .execute(&pool)
    .await?;

    Ok(id)
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
