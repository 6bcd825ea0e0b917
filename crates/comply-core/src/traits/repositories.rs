//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{
    CheckResult, ComplianceCheck, ComplianceRule, PanelUpload, RegulatorySource,
    RuleAuditLogEntry, RuleChangeSuggestion, State, User,
};
use crate::error::DomainError;
use crate::value_objects::SuggestionStatus;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// State Repository
// ============================================================================

#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Find state by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<State>>;

    /// Find state by two-letter code (case-insensitive)
    async fn find_by_code(&self, code: &str) -> RepoResult<Option<State>>;

    /// List all active states ordered by code
    async fn list_active(&self) -> RepoResult<Vec<State>>;

    /// Create a new state
    async fn create(&self, state: &State) -> RepoResult<()>;

    /// Update an existing state
    async fn update(&self, state: &State) -> RepoResult<()>;
}

// ============================================================================
// Regulatory Source Repository
// ============================================================================

#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Find source by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<RegulatorySource>>;

    /// List all sources for a state
    async fn find_by_state(&self, state_id: Uuid) -> RepoResult<Vec<RegulatorySource>>;

    /// List all active sources ordered by state then name
    async fn list_active(&self) -> RepoResult<Vec<RegulatorySource>>;

    /// Create a new source
    async fn create(&self, source: &RegulatorySource) -> RepoResult<()>;

    /// Update an existing source
    async fn update(&self, source: &RegulatorySource) -> RepoResult<()>;

    /// Record a check attempt: bump `last_checked`, and when the content
    /// hash moved also store it and bump `last_content_change`
    async fn record_check(
        &self,
        id: Uuid,
        checked_at: DateTime<Utc>,
        new_hash: Option<&str>,
    ) -> RepoResult<()>;

    /// Soft delete a source
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Compliance Rule Repository
// ============================================================================

#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// Find rule by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ComplianceRule>>;

    /// List active rules for a state
    async fn find_active_by_state(&self, state_id: Uuid) -> RepoResult<Vec<ComplianceRule>>;

    /// List all rules for a state, active or not
    async fn find_by_state(&self, state_id: Uuid) -> RepoResult<Vec<ComplianceRule>>;

    /// Create a new rule
    async fn create(&self, rule: &ComplianceRule) -> RepoResult<()>;

    /// Update a rule guarded by its expected version
    ///
    /// The write only lands when the stored version still equals
    /// `expected_version`; otherwise `DomainError::VersionConflict` is
    /// returned and the caller must re-read.
    async fn update_with_version(
        &self,
        rule: &ComplianceRule,
        expected_version: i32,
    ) -> RepoResult<()>;

    /// Flip `is_active` without touching rule content
    async fn set_active(&self, id: Uuid, is_active: bool) -> RepoResult<()>;
}

// ============================================================================
// Suggestion Repository
// ============================================================================

/// Filter options for suggestion listings
#[derive(Debug, Clone, Default)]
pub struct SuggestionQuery {
    pub state_id: Option<Uuid>,
    pub status: Option<SuggestionStatus>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    /// Find suggestion by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<RuleChangeSuggestion>>;

    /// List suggestions matching the query, newest first
    async fn find(&self, query: SuggestionQuery) -> RepoResult<Vec<RuleChangeSuggestion>>;

    /// Check whether a pending suggestion already exists for this state and
    /// suggested rule name
    async fn has_pending(&self, state_id: Uuid, suggested_name: &str) -> RepoResult<bool>;

    /// Create a new suggestion
    async fn create(&self, suggestion: &RuleChangeSuggestion) -> RepoResult<()>;

    /// Persist a review decision
    async fn update(&self, suggestion: &RuleChangeSuggestion) -> RepoResult<()>;

    /// Count pending suggestions, optionally scoped to a state
    async fn count_pending(&self, state_id: Option<Uuid>) -> RepoResult<i64>;
}

// ============================================================================
// Audit Log Repository
// ============================================================================

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append an audit entry; entries are never updated or deleted
    async fn append(&self, entry: &RuleAuditLogEntry) -> RepoResult<()>;

    /// List audit history for a rule, newest first
    async fn find_by_rule(&self, rule_id: Uuid) -> RepoResult<Vec<RuleAuditLogEntry>>;

    /// List recent audit entries across all rules
    async fn find_recent(&self, limit: i64) -> RepoResult<Vec<RuleAuditLogEntry>>;
}

// ============================================================================
// Compliance Check Repository
// ============================================================================

#[async_trait]
pub trait CheckRepository: Send + Sync {
    /// Find check by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ComplianceCheck>>;

    /// List checks owned by a user, newest first
    async fn find_by_owner(&self, owner_id: Uuid, limit: i64, offset: i64)
        -> RepoResult<Vec<ComplianceCheck>>;

    /// Create a new check
    async fn create(&self, check: &ComplianceCheck) -> RepoResult<()>;

    /// Update status, counts, and completion fields
    async fn update(&self, check: &ComplianceCheck) -> RepoResult<()>;
}

// ============================================================================
// Panel Upload Repository
// ============================================================================

#[async_trait]
pub trait PanelRepository: Send + Sync {
    /// Find panel by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<PanelUpload>>;

    /// List panels for a check in upload order
    async fn find_by_check(&self, check_id: Uuid) -> RepoResult<Vec<PanelUpload>>;

    /// Create a new panel record
    async fn create(&self, panel: &PanelUpload) -> RepoResult<()>;

    /// Store the vision extraction and any review flags
    async fn update_extraction(&self, panel: &PanelUpload) -> RepoResult<()>;
}

// ============================================================================
// Check Result Repository
// ============================================================================

#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// List results for a check in rule order
    async fn find_by_check(&self, check_id: Uuid) -> RepoResult<Vec<CheckResult>>;

    /// Insert the full result set for a check in one transaction
    async fn create_batch(&self, results: &[CheckResult]) -> RepoResult<()>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>>;
}
