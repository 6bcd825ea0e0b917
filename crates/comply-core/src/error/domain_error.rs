//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

use crate::value_objects::SuggestionStatus;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("State not found: {0}")]
    StateNotFound(Uuid),

    #[error("Regulatory source not found: {0}")]
    SourceNotFound(Uuid),

    #[error("Compliance rule not found: {0}")]
    RuleNotFound(Uuid),

    #[error("Suggestion not found: {0}")]
    SuggestionNotFound(Uuid),

    #[error("Check not found: {0}")]
    CheckNotFound(Uuid),

    #[error("Panel not found: {0}")]
    PanelNotFound(Uuid),

    #[error("User not found: {0}")]
    UserNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Suggestion requires an existing rule reference")]
    MissingExistingRule,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Suggestion already reviewed: {status}")]
    SuggestionAlreadyReviewed { status: SuggestionStatus },

    #[error("Pending suggestion already exists for rule name: {name}")]
    DuplicatePendingSuggestion { name: String },

    #[error("Rule version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: i32, actual: i32 },

    #[error("Email already in use")]
    EmailAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::StateNotFound(_) => "UNKNOWN_STATE",
            Self::SourceNotFound(_) => "UNKNOWN_SOURCE",
            Self::RuleNotFound(_) => "UNKNOWN_RULE",
            Self::SuggestionNotFound(_) => "UNKNOWN_SUGGESTION",
            Self::CheckNotFound(_) => "UNKNOWN_CHECK",
            Self::PanelNotFound(_) => "UNKNOWN_PANEL",
            Self::UserNotFound(_) => "UNKNOWN_USER",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::MissingExistingRule => "MISSING_EXISTING_RULE",

            Self::SuggestionAlreadyReviewed { .. } => "SUGGESTION_ALREADY_REVIEWED",
            Self::DuplicatePendingSuggestion { .. } => "DUPLICATE_PENDING_SUGGESTION",
            Self::VersionConflict { .. } => "RULE_VERSION_CONFLICT",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::StateNotFound(_)
                | Self::SourceNotFound(_)
                | Self::RuleNotFound(_)
                | Self::SuggestionNotFound(_)
                | Self::CheckNotFound(_)
                | Self::PanelNotFound(_)
                | Self::UserNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::MissingExistingRule)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SuggestionAlreadyReviewed { .. }
                | Self::DuplicatePendingSuggestion { .. }
                | Self::VersionConflict { .. }
                | Self::EmailAlreadyExists
        )
    }
}
