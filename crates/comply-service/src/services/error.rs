//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use comply_ai::ProviderError;
use comply_common::AppError;
use comply_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Application error (auth, validation, provider, etc.)
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Caller lacks the admin role
    AdminRequired,

    /// Validation error
    Validation(String),

    /// Conflict (e.g., duplicate resource)
    Conflict(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::AdminRequired => write!(f, "Admin role required"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_validation() {
                    400
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
            Self::App(e) => e.status_code(),
            Self::NotFound { .. } => 404,
            Self::AdminRequired => 403,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ProviderError> for ServiceError {
    fn from(err: ProviderError) -> Self {
        Self::App(match err {
            ProviderError::RateLimited(_) => AppError::RateLimitExceeded,
            ProviderError::QuotaExhausted(msg) => AppError::QuotaExhausted(msg),
            ProviderError::MissingApiKey(provider) => {
                AppError::Config(format!("{provider} provider has no API key"))
            }
            other => AppError::ExternalService(other.to_string()),
        })
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::AdminRequired => AppError::InsufficientPermissions,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::not_found("Rule", "123");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.to_string().contains("Rule not found: 123"));
    }

    #[test]
    fn test_admin_required_error() {
        let err = ServiceError::AdminRequired;
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "ADMIN_REQUIRED");
    }

    #[test]
    fn test_validation_error() {
        let err = ServiceError::validation("Invalid email format");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_provider_rate_limit_maps_to_429() {
        let err = ServiceError::from(ProviderError::RateLimited("slow down".into()));
        assert_eq!(err.status_code(), 429);
        assert_eq!(err.error_code(), "RATE_LIMIT_EXCEEDED");
    }

    #[test]
    fn test_provider_quota_maps_to_402() {
        let err = ServiceError::from(ProviderError::QuotaExhausted("no credit".into()));
        assert_eq!(err.status_code(), 402);
        assert_eq!(err.error_code(), "QUOTA_EXHAUSTED");
    }

    #[test]
    fn test_provider_transport_maps_to_502() {
        let err = ServiceError::from(ProviderError::Transport("reset".into()));
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.error_code(), "EXTERNAL_SERVICE_ERROR");
    }

    #[test]
    fn test_convert_to_app_error() {
        let service_err = ServiceError::not_found("Check", "456");
        let app_err: AppError = service_err.into();
        assert_eq!(app_err.status_code(), 404);
    }
}
