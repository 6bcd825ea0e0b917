//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use comply_core::value_objects::{PanelType, RuleCategory, Severity};

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 2, max = 64, message = "Display name must be 2-64 characters"))]
    pub display_name: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

// ============================================================================
// State Requests
// ============================================================================

/// Create state request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStateRequest {
    #[validate(length(equal = 2, message = "State code must be 2 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 100, message = "State name must be 1-100 characters"))]
    pub name: String,
}

/// Update state request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStateRequest {
    #[validate(length(min = 1, max = 100, message = "State name must be 1-100 characters"))]
    pub name: Option<String>,

    pub is_active: Option<bool>,
}

// ============================================================================
// Regulatory Source Requests
// ============================================================================

/// Register a government page for monitoring
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSourceRequest {
    pub state_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Source name must be 1-200 characters"))]
    pub source_name: String,

    #[validate(url(message = "Invalid source URL"))]
    pub source_url: String,

    #[validate(range(min = 1, max = 365, message = "Check frequency must be 1-365 days"))]
    pub check_frequency_days: Option<i32>,
}

/// Update source request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSourceRequest {
    #[validate(length(min = 1, max = 200, message = "Source name must be 1-200 characters"))]
    pub source_name: Option<String>,

    #[validate(url(message = "Invalid source URL"))]
    pub source_url: Option<String>,

    #[validate(range(min = 1, max = 365, message = "Check frequency must be 1-365 days"))]
    pub check_frequency_days: Option<i32>,

    pub is_active: Option<bool>,
}

// ============================================================================
// Compliance Rule Requests
// ============================================================================

/// Create rule request (direct admin edit, bypassing the suggestion flow)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRuleRequest {
    pub state_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Rule name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 4000, message = "Description must be 1-4000 characters"))]
    pub description: String,

    pub category: RuleCategory,
    pub severity: Severity,

    #[validate(length(max = 200, message = "Citation must be at most 200 characters"))]
    pub citation: Option<String>,

    #[validate(url(message = "Invalid source URL"))]
    pub source_url: Option<String>,

    #[serde(default)]
    pub product_types: Vec<String>,

    #[validate(length(max = 4000, message = "Validation prompt must be at most 4000 characters"))]
    pub validation_prompt: Option<String>,

    /// Free-text reason recorded in the audit log
    #[validate(length(max = 1000, message = "Reason must be at most 1000 characters"))]
    pub reason: Option<String>,
}

/// Update rule request, guarded by the version the caller last read
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRuleRequest {
    #[validate(length(min = 1, max = 200, message = "Rule name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 4000, message = "Description must be 1-4000 characters"))]
    pub description: Option<String>,

    pub category: Option<RuleCategory>,
    pub severity: Option<Severity>,

    #[validate(length(max = 200, message = "Citation must be at most 200 characters"))]
    pub citation: Option<String>,

    #[validate(url(message = "Invalid source URL"))]
    pub source_url: Option<String>,

    pub product_types: Option<Vec<String>>,

    #[validate(length(max = 4000, message = "Validation prompt must be at most 4000 characters"))]
    pub validation_prompt: Option<String>,

    /// Version the caller read; the update is rejected if the rule moved
    pub expected_version: i32,

    #[validate(length(max = 1000, message = "Reason must be at most 1000 characters"))]
    pub reason: Option<String>,
}

/// Scope and mode for an on-demand source check run
///
/// `force` runs the diff analyzer even when the content hash is unchanged;
/// `web_search` enables the verified-URL filter on analyzer output.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RunChecksRequest {
    pub state_id: Option<Uuid>,
    pub source_id: Option<Uuid>,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub web_search: bool,
}

// ============================================================================
// Suggestion Review Requests
// ============================================================================

/// Approve or reject a pending suggestion
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReviewSuggestionRequest {
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

// ============================================================================
// Compliance Check Requests
// ============================================================================

/// Start a new label compliance check
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCheckRequest {
    pub state_id: Uuid,

    #[validate(length(min = 1, max = 50, message = "Product type must be 1-50 characters"))]
    pub product_type: String,
}

/// Metadata accompanying one uploaded panel image
#[derive(Debug, Clone)]
pub struct UploadPanelRequest {
    pub panel_type: PanelType,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Options for running the analysis of a check
///
/// `rule_ids` adds specific rules (typically internal ones scoped to other
/// product types) on top of the state's applicable active rules.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AnalyzeCheckRequest {
    pub rule_ids: Option<Vec<Uuid>>,
}
