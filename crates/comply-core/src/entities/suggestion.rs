//! Rule change suggestion entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::{ChangeType, RuleCategory, Severity, SuggestionStatus};

/// An AI-proposed addition/update/deprecation of a compliance rule
///
/// Created only by the diff analyzer (scheduled or admin-triggered checks).
/// Terminal once approved or rejected; there is no resurrection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleChangeSuggestion {
    pub id: Uuid,
    pub state_id: Uuid,
    pub source_id: Option<Uuid>,
    pub existing_rule_id: Option<Uuid>,
    pub change_type: ChangeType,
    pub suggested_name: String,
    pub suggested_description: Option<String>,
    pub suggested_category: Option<RuleCategory>,
    pub suggested_severity: Option<Severity>,
    pub suggested_citation: Option<String>,
    pub suggested_source_url: Option<String>,
    pub ai_reasoning: Option<String>,
    /// Short verbatim excerpt from the scraped source text
    pub source_excerpt: Option<String>,
    pub status: SuggestionStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RuleChangeSuggestion {
    pub fn new(
        id: Uuid,
        state_id: Uuid,
        change_type: ChangeType,
        suggested_name: String,
    ) -> Self {
        Self {
            id,
            state_id,
            source_id: None,
            existing_rule_id: None,
            change_type,
            suggested_name,
            suggested_description: None,
            suggested_category: None,
            suggested_severity: None,
            suggested_citation: None,
            suggested_source_url: None,
            ai_reasoning: None,
            source_excerpt: None,
            status: SuggestionStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the suggestion can still be reviewed
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == SuggestionStatus::Pending
    }

    /// Mark reviewed; the caller decides approved vs rejected
    pub fn mark_reviewed(
        &mut self,
        status: SuggestionStatus,
        reviewer: Uuid,
        notes: Option<String>,
    ) {
        self.status = status;
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(Utc::now());
        self.review_notes = notes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_suggestion_is_pending() {
        let s = RuleChangeSuggestion::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            ChangeType::New,
            "THC Symbol Size".to_string(),
        );
        assert!(s.is_pending());
        assert!(s.reviewed_at.is_none());
    }

    #[test]
    fn test_mark_reviewed() {
        let mut s = RuleChangeSuggestion::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            ChangeType::Update,
            "Net Weight Statement".to_string(),
        );
        let reviewer = Uuid::new_v4();
        s.mark_reviewed(SuggestionStatus::Rejected, reviewer, Some("duplicate".into()));

        assert!(!s.is_pending());
        assert_eq!(s.reviewed_by, Some(reviewer));
        assert!(s.reviewed_at.is_some());
        assert_eq!(s.review_notes.as_deref(), Some("duplicate"));
    }
}
