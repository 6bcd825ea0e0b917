//! Service context - dependency container for services
//!
//! Holds all repositories, provider clients, and other dependencies needed
//! by services.

use std::sync::Arc;
use std::time::Duration;

use comply_ai::{ReasoningClient, RetryPolicy, ScrapeClient, SearchClient, VisionClient};
use comply_common::auth::{JwtService, PasswordService};
use comply_common::config::AnalysisConfig;
use comply_common::storage::ObjectStore;
use comply_core::traits::{
    AuditLogRepository, CheckRepository, PanelRepository, ResultRepository, RuleRepository,
    SourceRepository, StateRepository, SuggestionRepository, UserRepository,
};
use comply_db::PgPool;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - Blob storage for uploaded panel images
/// - JWT and password services for authentication
/// - Outbound AI provider clients and their retry policy
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: PgPool,

    // Repositories
    state_repo: Arc<dyn StateRepository>,
    source_repo: Arc<dyn SourceRepository>,
    rule_repo: Arc<dyn RuleRepository>,
    suggestion_repo: Arc<dyn SuggestionRepository>,
    audit_repo: Arc<dyn AuditLogRepository>,
    check_repo: Arc<dyn CheckRepository>,
    panel_repo: Arc<dyn PanelRepository>,
    result_repo: Arc<dyn ResultRepository>,
    user_repo: Arc<dyn UserRepository>,

    // Storage
    object_store: Arc<dyn ObjectStore>,

    // Auth
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,

    // Provider clients
    scrape_client: Arc<ScrapeClient>,
    reasoning_client: Arc<ReasoningClient>,
    vision_client: Arc<VisionClient>,
    search_client: Arc<SearchClient>,

    // Analysis knobs
    retry_policy: RetryPolicy,
    analysis: AnalysisConfig,
}

impl ServiceContext {
    // === Database Pool ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Repositories ===

    /// Get the state repository
    pub fn state_repo(&self) -> &dyn StateRepository {
        self.state_repo.as_ref()
    }

    /// Get the regulatory source repository
    pub fn source_repo(&self) -> &dyn SourceRepository {
        self.source_repo.as_ref()
    }

    /// Get the compliance rule repository
    pub fn rule_repo(&self) -> &dyn RuleRepository {
        self.rule_repo.as_ref()
    }

    /// Get the suggestion repository
    pub fn suggestion_repo(&self) -> &dyn SuggestionRepository {
        self.suggestion_repo.as_ref()
    }

    /// Get the audit log repository
    pub fn audit_repo(&self) -> &dyn AuditLogRepository {
        self.audit_repo.as_ref()
    }

    /// Get the compliance check repository
    pub fn check_repo(&self) -> &dyn CheckRepository {
        self.check_repo.as_ref()
    }

    /// Get the panel upload repository
    pub fn panel_repo(&self) -> &dyn PanelRepository {
        self.panel_repo.as_ref()
    }

    /// Get the check result repository
    pub fn result_repo(&self) -> &dyn ResultRepository {
        self.result_repo.as_ref()
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    // === Storage ===

    /// Get the blob store for panel images
    pub fn object_store(&self) -> &dyn ObjectStore {
        self.object_store.as_ref()
    }

    // === Auth ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the password service
    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    // === Provider clients ===

    /// Get the page scrape client
    pub fn scrape_client(&self) -> &ScrapeClient {
        self.scrape_client.as_ref()
    }

    /// Get the text reasoning client
    pub fn reasoning_client(&self) -> &ReasoningClient {
        self.reasoning_client.as_ref()
    }

    /// Get the label vision client
    pub fn vision_client(&self) -> &VisionClient {
        self.vision_client.as_ref()
    }

    /// Get the web search client
    pub fn search_client(&self) -> &SearchClient {
        self.search_client.as_ref()
    }

    /// Get the retry policy for provider calls
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Get the analysis configuration
    pub fn analysis(&self) -> &AnalysisConfig {
        &self.analysis
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("repositories", &"...")
            .field("providers", &"...")
            .field("analysis", &self.analysis)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    state_repo: Option<Arc<dyn StateRepository>>,
    source_repo: Option<Arc<dyn SourceRepository>>,
    rule_repo: Option<Arc<dyn RuleRepository>>,
    suggestion_repo: Option<Arc<dyn SuggestionRepository>>,
    audit_repo: Option<Arc<dyn AuditLogRepository>>,
    check_repo: Option<Arc<dyn CheckRepository>>,
    panel_repo: Option<Arc<dyn PanelRepository>>,
    result_repo: Option<Arc<dyn ResultRepository>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    object_store: Option<Arc<dyn ObjectStore>>,
    jwt_service: Option<Arc<JwtService>>,
    password_service: PasswordService,
    scrape_client: Option<Arc<ScrapeClient>>,
    reasoning_client: Option<Arc<ReasoningClient>>,
    vision_client: Option<Arc<VisionClient>>,
    search_client: Option<Arc<SearchClient>>,
    retry_policy: RetryPolicy,
    analysis: Option<AnalysisConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            state_repo: None,
            source_repo: None,
            rule_repo: None,
            suggestion_repo: None,
            audit_repo: None,
            check_repo: None,
            panel_repo: None,
            result_repo: None,
            user_repo: None,
            object_store: None,
            jwt_service: None,
            password_service: PasswordService::new(),
            scrape_client: None,
            reasoning_client: None,
            vision_client: None,
            search_client: None,
            retry_policy: RetryPolicy::default(),
            analysis: None,
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn state_repo(mut self, repo: Arc<dyn StateRepository>) -> Self {
        self.state_repo = Some(repo);
        self
    }

    pub fn source_repo(mut self, repo: Arc<dyn SourceRepository>) -> Self {
        self.source_repo = Some(repo);
        self
    }

    pub fn rule_repo(mut self, repo: Arc<dyn RuleRepository>) -> Self {
        self.rule_repo = Some(repo);
        self
    }

    pub fn suggestion_repo(mut self, repo: Arc<dyn SuggestionRepository>) -> Self {
        self.suggestion_repo = Some(repo);
        self
    }

    pub fn audit_repo(mut self, repo: Arc<dyn AuditLogRepository>) -> Self {
        self.audit_repo = Some(repo);
        self
    }

    pub fn check_repo(mut self, repo: Arc<dyn CheckRepository>) -> Self {
        self.check_repo = Some(repo);
        self
    }

    pub fn panel_repo(mut self, repo: Arc<dyn PanelRepository>) -> Self {
        self.panel_repo = Some(repo);
        self
    }

    pub fn result_repo(mut self, repo: Arc<dyn ResultRepository>) -> Self {
        self.result_repo = Some(repo);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(store);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn scrape_client(mut self, client: Arc<ScrapeClient>) -> Self {
        self.scrape_client = Some(client);
        self
    }

    pub fn reasoning_client(mut self, client: Arc<ReasoningClient>) -> Self {
        self.reasoning_client = Some(client);
        self
    }

    pub fn vision_client(mut self, client: Arc<VisionClient>) -> Self {
        self.vision_client = Some(client);
        self
    }

    pub fn search_client(mut self, client: Arc<SearchClient>) -> Self {
        self.search_client = Some(client);
        self
    }

    /// Derive the retry policy and analysis knobs from configuration
    pub fn analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.retry_policy = RetryPolicy::new(
            analysis.retry_max_attempts,
            Duration::from_millis(analysis.retry_base_delay_ms),
        );
        self.analysis = Some(analysis);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext {
            pool: self
                .pool
                .ok_or_else(|| ServiceError::validation("pool is required"))?,
            state_repo: self
                .state_repo
                .ok_or_else(|| ServiceError::validation("state_repo is required"))?,
            source_repo: self
                .source_repo
                .ok_or_else(|| ServiceError::validation("source_repo is required"))?,
            rule_repo: self
                .rule_repo
                .ok_or_else(|| ServiceError::validation("rule_repo is required"))?,
            suggestion_repo: self
                .suggestion_repo
                .ok_or_else(|| ServiceError::validation("suggestion_repo is required"))?,
            audit_repo: self
                .audit_repo
                .ok_or_else(|| ServiceError::validation("audit_repo is required"))?,
            check_repo: self
                .check_repo
                .ok_or_else(|| ServiceError::validation("check_repo is required"))?,
            panel_repo: self
                .panel_repo
                .ok_or_else(|| ServiceError::validation("panel_repo is required"))?,
            result_repo: self
                .result_repo
                .ok_or_else(|| ServiceError::validation("result_repo is required"))?,
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            object_store: self
                .object_store
                .ok_or_else(|| ServiceError::validation("object_store is required"))?,
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            password_service: self.password_service,
            scrape_client: self
                .scrape_client
                .ok_or_else(|| ServiceError::validation("scrape_client is required"))?,
            reasoning_client: self
                .reasoning_client
                .ok_or_else(|| ServiceError::validation("reasoning_client is required"))?,
            vision_client: self
                .vision_client
                .ok_or_else(|| ServiceError::validation("vision_client is required"))?,
            search_client: self
                .search_client
                .ok_or_else(|| ServiceError::validation("search_client is required"))?,
            retry_policy: self.retry_policy,
            analysis: self
                .analysis
                .ok_or_else(|| ServiceError::validation("analysis config is required"))?,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
