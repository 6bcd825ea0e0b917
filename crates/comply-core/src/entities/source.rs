//! Regulatory source entity - a government page tracked for content changes

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// A government web page monitored by the check pipeline
///
/// `content_hash`, `last_checked`, and `last_content_change` are mutated only
/// by the check pipeline. Sources are never deleted, only deactivated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegulatorySource {
    pub id: Uuid,
    pub state_id: Uuid,
    pub source_name: String,
    pub source_url: String,
    /// SHA-256 hex digest of the last fetched content
    pub content_hash: Option<String>,
    pub last_checked: Option<DateTime<Utc>>,
    pub last_content_change: Option<DateTime<Utc>>,
    pub check_frequency_days: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RegulatorySource {
    pub fn new(
        id: Uuid,
        state_id: Uuid,
        source_name: String,
        source_url: String,
        check_frequency_days: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            state_id,
            source_name,
            source_url,
            content_hash: None,
            last_checked: None,
            last_content_change: None,
            check_frequency_days,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the source is due for a check at `now`
    ///
    /// Never-checked sources are always due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_checked {
            None => true,
            Some(last) => now - last >= Duration::days(i64::from(self.check_frequency_days)),
        }
    }

    /// Whether `new_hash` differs from the stored digest
    ///
    /// A source with no stored digest always counts as changed.
    pub fn content_changed(&self, new_hash: &str) -> bool {
        self.content_hash.as_deref() != Some(new_hash)
    }
}
