//! Value objects - typed enums, jurisdictions, and the citation resolver

mod citation;
mod enums;
mod jurisdiction;

pub use citation::{resolve_citation, CitationLink, LinkKind};
pub use enums::{
    AuditAction, ChangeType, CheckStatus, EnumParseError, PanelType, ResultStatus, RuleCategory,
    Severity, SourceType, SuggestionStatus, UserRole,
};
pub use jurisdiction::Jurisdiction;
