//! Compliance rule entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::{RuleCategory, Severity, SourceType};

/// A labeling requirement scored against uploaded panels
///
/// Owned by the admin review workflow and direct admin edits; `version`
/// increments on every mutation and `is_active=false` soft-deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceRule {
    pub id: Uuid,
    pub state_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub citation: Option<String>,
    pub source_url: Option<String>,
    pub source_type: SourceType,
    /// Product types the rule applies to; empty means all products
    pub product_types: Vec<String>,
    /// Optional extra instruction passed to the scoring model for this rule
    pub validation_prompt: Option<String>,
    pub is_active: bool,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComplianceRule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        state_id: Uuid,
        name: String,
        description: String,
        category: RuleCategory,
        severity: Severity,
        source_type: SourceType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            state_id,
            name,
            description,
            category,
            severity,
            citation: None,
            source_url: None,
            source_type,
            product_types: Vec::new(),
            validation_prompt: None,
            is_active: true,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this rule applies to the given product type
    pub fn applies_to(&self, product_type: &str) -> bool {
        self.product_types.is_empty()
            || self
                .product_types
                .iter()
                .any(|p| p.eq_ignore_ascii_case(product_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> ComplianceRule {
        ComplianceRule::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "THC Symbol Size".to_string(),
            "Universal THC symbol must be at least 0.5 inch square".to_string(),
            RuleCategory::Symbols,
            Severity::Error,
            SourceType::Regulatory,
        )
    }

    #[test]
    fn test_new_rule_defaults() {
        let r = rule();
        assert_eq!(r.version, 1);
        assert!(r.is_active);
        assert!(r.product_types.is_empty());
    }

    #[test]
    fn test_applies_to_all_when_unrestricted() {
        assert!(rule().applies_to("edible"));
    }

    #[test]
    fn test_applies_to_filtered() {
        let mut r = rule();
        r.product_types = vec!["edible".to_string(), "concentrate".to_string()];
        assert!(r.applies_to("Edible"));
        assert!(!r.applies_to("flower"));
    }
}
