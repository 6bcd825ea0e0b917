//! Test fixtures and data generators
//!
//! Provides reusable request and response shapes for integration tests.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A random two-character state code
///
/// The test database persists between runs, so codes are drawn from a fresh
/// UUID rather than a counter. Callers that create states should retry on
/// 409 in case of a collision.
pub fn random_state_code() -> String {
    Uuid::new_v4().simple().to_string()[..2].to_uppercase()
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        let run = Uuid::new_v4().simple().to_string();
        Self {
            email: format!("test{suffix}.{run}@example.com"),
            display_name: format!("Test User {suffix}"),
            password: "TestPass123!".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub created_at: String,
}

// ============================================================================
// States
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateStateRequest {
    pub code: String,
    pub name: String,
}

impl CreateStateRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            code: random_state_code(),
            name: format!("Test State {suffix}"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateStateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct StateResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub is_active: bool,
}

// ============================================================================
// Sources
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateSourceRequest {
    pub state_id: Uuid,
    pub source_name: String,
    pub source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_frequency_days: Option<i32>,
}

impl CreateSourceRequest {
    pub fn unique(state_id: Uuid) -> Self {
        let suffix = unique_suffix();
        Self {
            state_id,
            source_name: format!("Labeling Rules Page {suffix}"),
            source_url: format!("https://example.gov/cannabis/labeling/{suffix}"),
            check_frequency_days: Some(7),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SourceResponse {
    pub id: Uuid,
    pub state_id: Uuid,
    pub source_name: String,
    pub source_url: String,
    pub content_hash: Option<String>,
    pub check_frequency_days: i32,
    pub is_active: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct RunChecksRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<Uuid>,
    pub force: bool,
    pub web_search: bool,
}

#[derive(Debug, Deserialize)]
pub struct CheckRunSummary {
    pub checked: usize,
    pub no_changes: usize,
    pub changed: usize,
    pub failed: usize,
    pub suggestions_created: usize,
    pub outcomes: Vec<CheckRunOutcome>,
}

#[derive(Debug, Deserialize)]
pub struct CheckRunOutcome {
    pub source_id: Uuid,
    pub source_name: String,
    pub status: String,
    pub suggestions_created: usize,
    pub skipped: usize,
    pub error: Option<String>,
}

// ============================================================================
// Rules
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateRuleRequest {
    pub state_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    pub product_types: Vec<String>,
}

impl CreateRuleRequest {
    pub fn unique(state_id: Uuid) -> Self {
        let suffix = unique_suffix();
        Self {
            state_id,
            name: format!("THC warning symbol {suffix}"),
            description: "The universal THC warning symbol must appear on the front panel"
                .to_string(),
            category: "warnings".to_string(),
            severity: "error".to_string(),
            citation: None,
            product_types: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateRuleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub expected_version: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RuleResponse {
    pub id: Uuid,
    pub state_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub severity: String,
    pub source_type: String,
    pub is_active: bool,
    pub version: i32,
}

#[derive(Debug, Deserialize)]
pub struct AuditEntryResponse {
    pub id: Uuid,
    pub rule_id: Option<Uuid>,
    pub action: String,
    pub changed_by: Option<Uuid>,
    pub change_reason: Option<String>,
    pub suggestion_id: Option<Uuid>,
}

// ============================================================================
// Checks
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateCheckRequest {
    pub state_id: Uuid,
    pub product_type: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckResponse {
    pub id: Uuid,
    pub state_id: Uuid,
    pub product_type: String,
    pub status: String,
    pub overall_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PanelResponse {
    pub id: Uuid,
    pub check_id: Uuid,
    pub panel_type: String,
    pub content_type: String,
    pub flagged_for_review: bool,
}

#[derive(Debug, Deserialize)]
pub struct PaginatedChecks {
    pub data: Vec<CheckResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Deserialize)]
pub struct PaginationMeta {
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

// ============================================================================
// Suggestions
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SuggestionResponse {
    pub id: Uuid,
    pub state_id: Uuid,
    pub existing_rule_id: Option<Uuid>,
    pub change_type: String,
    pub suggested_name: String,
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub review_notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PendingCountResponse {
    pub count: i64,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// A tiny valid PNG (1x1 transparent pixel) for panel upload tests
pub fn tiny_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9C, 0x62, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
        0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}
