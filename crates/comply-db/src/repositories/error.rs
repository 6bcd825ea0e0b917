//! Error handling utilities for repositories

use comply_core::DomainError;
use sqlx::Error as SqlxError;
use uuid::Uuid;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "state not found" error
pub fn state_not_found(id: Uuid) -> DomainError {
    DomainError::StateNotFound(id)
}

/// Create a "source not found" error
pub fn source_not_found(id: Uuid) -> DomainError {
    DomainError::SourceNotFound(id)
}

/// Create a "rule not found" error
pub fn rule_not_found(id: Uuid) -> DomainError {
    DomainError::RuleNotFound(id)
}

/// Create a "suggestion not found" error
pub fn suggestion_not_found(id: Uuid) -> DomainError {
    DomainError::SuggestionNotFound(id)
}

/// Create a "check not found" error
pub fn check_not_found(id: Uuid) -> DomainError {
    DomainError::CheckNotFound(id)
}

/// Create a "panel not found" error
pub fn panel_not_found(id: Uuid) -> DomainError {
    DomainError::PanelNotFound(id)
}
