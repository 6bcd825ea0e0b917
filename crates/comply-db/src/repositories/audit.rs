//! PostgreSQL implementation of AuditLogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use comply_core::traits::{AuditLogRepository, RepoResult};
use comply_core::{DomainError, RuleAuditLogEntry, RuleSnapshot};

use crate::models::AuditLogModel;

use super::error::map_db_error;

const AUDIT_COLUMNS: &str = r"
    id, rule_id, state_id, action, changed_by, change_reason,
    previous_version, new_version, suggestion_id, created_at
";

/// PostgreSQL implementation of AuditLogRepository
#[derive(Clone)]
pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn snapshot_json(snapshot: Option<&RuleSnapshot>) -> Result<Option<serde_json::Value>, DomainError> {
    snapshot
        .map(|s| {
            serde_json::to_value(s)
                .map_err(|e| DomainError::InternalError(format!("snapshot serialization: {e}")))
        })
        .transpose()
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    #[instrument(skip(self, entry))]
    async fn append(&self, entry: &RuleAuditLogEntry) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO rule_audit_log
                (id, rule_id, state_id, action, changed_by, change_reason,
                 previous_version, new_version, suggestion_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(entry.id)
        .bind(entry.rule_id)
        .bind(entry.state_id)
        .bind(entry.action.as_str())
        .bind(entry.changed_by)
        .bind(&entry.change_reason)
        .bind(snapshot_json(entry.previous_version.as_ref())?)
        .bind(snapshot_json(entry.new_version.as_ref())?)
        .bind(entry.suggestion_id)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_rule(&self, rule_id: Uuid) -> RepoResult<Vec<RuleAuditLogEntry>> {
        let result = sqlx::query_as::<_, AuditLogModel>(&format!(
            "SELECT {AUDIT_COLUMNS} FROM rule_audit_log WHERE rule_id = $1 ORDER BY created_at DESC"
        ))
        .bind(rule_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        result
            .into_iter()
            .map(RuleAuditLogEntry::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn find_recent(&self, limit: i64) -> RepoResult<Vec<RuleAuditLogEntry>> {
        let limit = if limit <= 0 { 50 } else { limit };

        let result = sqlx::query_as::<_, AuditLogModel>(&format!(
            "SELECT {AUDIT_COLUMNS} FROM rule_audit_log ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        result
            .into_iter()
            .map(RuleAuditLogEntry::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgAuditLogRepository>();
    }
}
