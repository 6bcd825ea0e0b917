//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use comply_ai::{ReasoningClient, ScrapeClient, SearchClient, VisionClient};
use comply_common::{AppConfig, AppError, FsObjectStore, JwtService};
use comply_db::{
    create_pool, PgAuditLogRepository, PgCheckRepository, PgPanelRepository, PgResultRepository,
    PgRuleRepository, PgSourceRepository, PgStateRepository, PgSuggestionRepository,
    PgUserRepository,
};
use comply_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::scheduler;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health routes bypass the rate limiter so probes keep working under load.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();

    // Panel uploads arrive as multipart, so the body limit follows the
    // configured image size plus form overhead
    let upload_limit = usize::try_from(config.storage.max_file_size_mb)
        .unwrap_or(usize::MAX)
        .saturating_mul(1024 * 1024)
        .saturating_add(64 * 1024);

    let api = create_router().layer(DefaultBodyLimit::max(upload_limit));
    let api = apply_middleware(
        api,
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );

    Router::new()
        .merge(health_routes())
        .merge(api)
        .with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = comply_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Create JWT service
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));

    // Create blob store for uploaded panel images
    let object_store = Arc::new(FsObjectStore::new(config.storage.upload_dir.clone()));

    // Create outbound provider clients
    let scrape_client = Arc::new(ScrapeClient::new(&config.providers.scrape));
    let reasoning_client = Arc::new(ReasoningClient::new(&config.providers.reasoning));
    let vision_client = Arc::new(VisionClient::new(&config.providers.vision));
    let search_client = Arc::new(SearchClient::new(&config.providers.search));

    // Create repositories
    let state_repo = Arc::new(PgStateRepository::new(pool.clone()));
    let source_repo = Arc::new(PgSourceRepository::new(pool.clone()));
    let rule_repo = Arc::new(PgRuleRepository::new(pool.clone()));
    let suggestion_repo = Arc::new(PgSuggestionRepository::new(pool.clone()));
    let audit_repo = Arc::new(PgAuditLogRepository::new(pool.clone()));
    let check_repo = Arc::new(PgCheckRepository::new(pool.clone()));
    let panel_repo = Arc::new(PgPanelRepository::new(pool.clone()));
    let result_repo = Arc::new(PgResultRepository::new(pool.clone()));
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .pool(pool)
        .state_repo(state_repo)
        .source_repo(source_repo)
        .rule_repo(rule_repo)
        .suggestion_repo(suggestion_repo)
        .audit_repo(audit_repo)
        .check_repo(check_repo)
        .panel_repo(panel_repo)
        .result_repo(result_repo)
        .user_repo(user_repo)
        .object_store(object_store)
        .jwt_service(jwt_service)
        .scrape_client(scrape_client)
        .reasoning_client(reasoning_client)
        .vision_client(vision_client)
        .search_client(search_client)
        .analysis(config.analysis.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));

    // Create app state
    let state = create_app_state(config).await?;

    // Start the background source-check scheduler
    let _scheduler = scheduler::spawn(state.clone());

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
