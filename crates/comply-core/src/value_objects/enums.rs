//! Closed enumerations shared across the domain
//!
//! Every enum round-trips through its snake_case string form, which is also
//! how values are stored in PostgreSQL text columns and exchanged with the
//! AI providers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string does not map onto a closed enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

impl EnumParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

macro_rules! impl_display_from_as_str {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Rule criticality tier driving pass/warning/fail scoring weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl FromStr for Severity {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(EnumParseError::new("severity", other)),
        }
    }
}

impl_display_from_as_str!(Severity);

/// Where a compliance rule originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Regulatory,
    Internal,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regulatory => "regulatory",
            Self::Internal => "internal",
        }
    }
}

impl FromStr for SourceType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regulatory" => Ok(Self::Regulatory),
            "internal" => Ok(Self::Internal),
            other => Err(EnumParseError::new("source_type", other)),
        }
    }
}

impl_display_from_as_str!(SourceType);

/// Fixed category list handed to the diff analyzer prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Labeling,
    Packaging,
    Warnings,
    Symbols,
    Testing,
    ChildResistance,
    Advertising,
    Other,
}

impl RuleCategory {
    pub const ALL: [Self; 8] = [
        Self::Labeling,
        Self::Packaging,
        Self::Warnings,
        Self::Symbols,
        Self::Testing,
        Self::ChildResistance,
        Self::Advertising,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Labeling => "labeling",
            Self::Packaging => "packaging",
            Self::Warnings => "warnings",
            Self::Symbols => "symbols",
            Self::Testing => "testing",
            Self::ChildResistance => "child_resistance",
            Self::Advertising => "advertising",
            Self::Other => "other",
        }
    }

    /// Lenient parse used on model output: unknown categories degrade to Other
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(Self::Other)
    }
}

impl FromStr for RuleCategory {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "labeling" | "labelling" => Ok(Self::Labeling),
            "packaging" => Ok(Self::Packaging),
            "warnings" | "warning" => Ok(Self::Warnings),
            "symbols" | "symbol" => Ok(Self::Symbols),
            "testing" => Ok(Self::Testing),
            "child_resistance" | "child_resistant" => Ok(Self::ChildResistance),
            "advertising" => Ok(Self::Advertising),
            "other" => Ok(Self::Other),
            other => Err(EnumParseError::new("rule_category", other)),
        }
    }
}

impl_display_from_as_str!(RuleCategory);

/// Kind of change the diff analyzer proposes against the rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    New,
    Update,
    Deprecate,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Update => "update",
            Self::Deprecate => "deprecate",
        }
    }

    /// Whether this change type requires an existing rule reference
    pub fn requires_existing_rule(&self) -> bool {
        matches!(self, Self::Update | Self::Deprecate)
    }
}

impl FromStr for ChangeType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Models use "add"/"remove" interchangeably with "new"/"deprecate"
        match s.trim().to_lowercase().as_str() {
            "new" | "add" => Ok(Self::New),
            "update" => Ok(Self::Update),
            "deprecate" | "remove" => Ok(Self::Deprecate),
            other => Err(EnumParseError::new("change_type", other)),
        }
    }
}

impl_display_from_as_str!(ChangeType);

/// Review state of a rule change suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Approved and rejected are terminal; there is no resurrection
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl FromStr for SuggestionStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(EnumParseError::new("suggestion_status", other)),
        }
    }
}

impl_display_from_as_str!(SuggestionStatus);

/// Action recorded in the rule audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Created,
    Updated,
    Deactivated,
    Reactivated,
    Deleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deactivated => "deactivated",
            Self::Reactivated => "reactivated",
            Self::Deleted => "deleted",
        }
    }
}

impl FromStr for AuditAction {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "deactivated" => Ok(Self::Deactivated),
            "reactivated" => Ok(Self::Reactivated),
            "deleted" => Ok(Self::Deleted),
            other => Err(EnumParseError::new("audit_action", other)),
        }
    }
}

impl_display_from_as_str!(AuditAction);

/// Per-rule scoring outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Pass,
    Warning,
    Fail,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warning => "warning",
            Self::Fail => "fail",
        }
    }
}

impl FromStr for ResultStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass" => Ok(Self::Pass),
            "warning" => Ok(Self::Warning),
            "fail" => Ok(Self::Fail),
            other => Err(EnumParseError::new("result_status", other)),
        }
    }
}

impl_display_from_as_str!(ResultStatus);

/// Lifecycle of a compliance check session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pending,
    Processing,
    Complete,
    Failed,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for CheckStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "complete" => Ok(Self::Complete),
            "failed" => Ok(Self::Failed),
            other => Err(EnumParseError::new("check_status", other)),
        }
    }
}

impl_display_from_as_str!(CheckStatus);

/// One photographed face of a product label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelType {
    Front,
    Back,
    Side,
    ExitBag,
}

impl PanelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Side => "side",
            Self::ExitBag => "exit_bag",
        }
    }
}

impl FromStr for PanelType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            "side" => Ok(Self::Side),
            "exit_bag" | "exitbag" | "exit-bag" => Ok(Self::ExitBag),
            other => Err(EnumParseError::new("panel_type", other)),
        }
    }
}

impl_display_from_as_str!(PanelType);

/// Role claim carried in access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Member,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for UserRole {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            other => Err(EnumParseError::new("user_role", other)),
        }
    }
}

impl_display_from_as_str!(UserRole);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_type_aliases() {
        assert_eq!("add".parse::<ChangeType>().unwrap(), ChangeType::New);
        assert_eq!("remove".parse::<ChangeType>().unwrap(), ChangeType::Deprecate);
        assert_eq!("UPDATE".parse::<ChangeType>().unwrap(), ChangeType::Update);
        assert!("merge".parse::<ChangeType>().is_err());
    }

    #[test]
    fn test_change_type_requires_existing_rule() {
        assert!(!ChangeType::New.requires_existing_rule());
        assert!(ChangeType::Update.requires_existing_rule());
        assert!(ChangeType::Deprecate.requires_existing_rule());
    }

    #[test]
    fn test_suggestion_status_terminal() {
        assert!(!SuggestionStatus::Pending.is_terminal());
        assert!(SuggestionStatus::Approved.is_terminal());
        assert!(SuggestionStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_category_lenient_parse() {
        assert_eq!(RuleCategory::parse_lenient("Child Resistant"), RuleCategory::ChildResistance);
        assert_eq!(RuleCategory::parse_lenient("something else"), RuleCategory::Other);
    }

    #[test]
    fn test_roundtrip_strings() {
        for sev in [Severity::Error, Severity::Warning, Severity::Info] {
            assert_eq!(sev.as_str().parse::<Severity>().unwrap(), sev);
        }
        for cat in RuleCategory::ALL {
            assert_eq!(cat.as_str().parse::<RuleCategory>().unwrap(), cat);
        }
    }

    #[test]
    fn test_serde_forms() {
        assert_eq!(serde_json::to_string(&PanelType::ExitBag).unwrap(), "\"exit_bag\"");
        assert_eq!(serde_json::to_string(&ResultStatus::Fail).unwrap(), "\"fail\"");
    }
}
