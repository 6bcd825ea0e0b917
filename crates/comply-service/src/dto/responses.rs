//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use comply_core::value_objects::{
    AuditAction, ChangeType, CheckStatus, CitationLink, PanelType, ResultStatus, RuleCategory,
    Severity, SourceType, SuggestionStatus, UserRole,
};

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginated response with offset pagination
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, limit: i64, offset: i64) -> Self {
        let has_more = data.len() as i64 >= limit;
        Self {
            data,
            pagination: PaginationMeta {
                limit,
                offset,
                has_more,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub limit: i64,
    pub offset: i64,
    /// Whether more results may exist beyond this page
    pub has_more: bool,
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with access token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(access_token: String, expires_in: i64, user: UserResponse) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

/// User profile
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// State Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub is_active: bool,
}

// ============================================================================
// Regulatory Source Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SourceResponse {
    pub id: Uuid,
    pub state_id: Uuid,
    pub source_name: String,
    pub source_url: String,
    pub content_hash: Option<String>,
    pub last_checked: Option<DateTime<Utc>>,
    pub last_content_change: Option<DateTime<Utc>>,
    pub check_frequency_days: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Compliance Rule Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RuleResponse {
    pub id: Uuid,
    pub state_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub citation: Option<String>,
    /// Best-effort link to the cited regulation text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation_link: Option<CitationLink>,
    pub source_url: Option<String>,
    pub source_type: SourceType,
    pub product_types: Vec<String>,
    pub validation_prompt: Option<String>,
    pub is_active: bool,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Suggestion Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub id: Uuid,
    pub state_id: Uuid,
    pub source_id: Option<Uuid>,
    pub existing_rule_id: Option<Uuid>,
    pub change_type: ChangeType,
    pub suggested_name: String,
    pub suggested_description: Option<String>,
    pub suggested_category: Option<RuleCategory>,
    pub suggested_severity: Option<Severity>,
    pub suggested_citation: Option<String>,
    pub suggested_source_url: Option<String>,
    pub ai_reasoning: Option<String>,
    pub source_excerpt: Option<String>,
    pub status: SuggestionStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Audit Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AuditEntryResponse {
    pub id: Uuid,
    pub rule_id: Option<Uuid>,
    pub state_id: Option<Uuid>,
    pub action: AuditAction,
    pub changed_by: Option<Uuid>,
    pub change_reason: Option<String>,
    pub previous_version: Option<JsonValue>,
    pub new_version: Option<JsonValue>,
    pub suggestion_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Compliance Check Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub id: Uuid,
    pub state_id: Uuid,
    pub product_type: String,
    pub status: CheckStatus,
    pub pass_count: i32,
    pub warning_count: i32,
    pub fail_count: i32,
    pub overall_status: Option<ResultStatus>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct PanelResponse {
    pub id: Uuid,
    pub check_id: Uuid,
    pub panel_type: PanelType,
    pub content_type: String,
    pub extraction: Option<JsonValue>,
    pub flagged_for_review: bool,
    pub flag_reasons: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CheckResultResponse {
    pub id: Uuid,
    pub rule_id: Uuid,
    pub rule_name: String,
    pub status: ResultStatus,
    pub found_value: Option<String>,
    pub expected_value: Option<String>,
    pub explanation: Option<String>,
}

/// Full check detail: the session plus its panels and per-rule results
#[derive(Debug, Serialize)]
pub struct CheckDetailResponse {
    #[serde(flatten)]
    pub check: CheckResponse,
    pub panels: Vec<PanelResponse>,
    pub results: Vec<CheckResultResponse>,
}
