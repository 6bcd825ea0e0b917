//! # comply-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! citation resolver. This crate has zero dependencies on infrastructure
//! (database, web framework, outbound HTTP, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    CheckResult, ComplianceCheck, ComplianceRule, PanelUpload, RegulatorySource,
    RuleAuditLogEntry, RuleChangeSuggestion, RuleSnapshot, State, User,
};
pub use error::DomainError;
pub use traits::{
    AuditLogRepository, CheckRepository, PanelRepository, ResultRepository, RepoResult,
    RuleRepository, SourceRepository, StateRepository, SuggestionQuery, SuggestionRepository,
    UserRepository,
};
pub use value_objects::{
    resolve_citation, AuditAction, ChangeType, CheckStatus, CitationLink, EnumParseError,
    Jurisdiction, LinkKind, PanelType, ResultStatus, RuleCategory, Severity, SourceType,
    SuggestionStatus, UserRole,
};
