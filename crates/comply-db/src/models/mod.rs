//! Database models - SQLx-compatible structs for PostgreSQL tables

mod audit_log;
mod check;
mod rule;
mod source;
mod state;
mod suggestion;
mod user;

pub use audit_log::AuditLogModel;
pub use check::{CheckModel, CheckResultModel, PanelModel};
pub use rule::RuleModel;
pub use source::SourceModel;
pub use state::StateModel;
pub use suggestion::SuggestionModel;
pub use user::UserModel;
