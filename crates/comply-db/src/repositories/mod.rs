//! PostgreSQL repository implementations

mod audit;
mod check;
mod error;
mod panel;
mod result;
mod rule;
mod source;
mod state;
mod suggestion;
mod user;

pub use audit::PgAuditLogRepository;
pub use check::PgCheckRepository;
pub use panel::PgPanelRepository;
pub use result::PgResultRepository;
pub use rule::PgRuleRepository;
pub use source::PgSourceRepository;
pub use state::PgStateRepository;
pub use suggestion::PgSuggestionRepository;
pub use user::PgUserRepository;
