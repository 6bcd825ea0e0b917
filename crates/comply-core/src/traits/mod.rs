//! Repository traits (ports)

mod repositories;

pub use repositories::{
    AuditLogRepository, CheckRepository, PanelRepository, RepoResult, ResultRepository,
    RuleRepository, SourceRepository, StateRepository, SuggestionQuery, SuggestionRepository,
    UserRepository,
};
