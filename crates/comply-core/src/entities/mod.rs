//! Domain entities

mod audit;
mod check;
mod rule;
mod source;
mod state;
mod suggestion;
mod user;

pub use audit::{RuleAuditLogEntry, RuleSnapshot};
pub use check::{CheckResult, ComplianceCheck, PanelUpload};
pub use rule::ComplianceRule;
pub use source::RegulatorySource;
pub use state::State;
pub use suggestion::RuleChangeSuggestion;
pub use user::User;
