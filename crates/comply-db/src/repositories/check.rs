//! PostgreSQL implementation of CheckRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use comply_core::traits::{CheckRepository, RepoResult};
use comply_core::ComplianceCheck;

use crate::models::CheckModel;

use super::error::{check_not_found, map_db_error};

const CHECK_COLUMNS: &str = r"
    id, owner_id, state_id, product_type, status, pass_count, warning_count,
    fail_count, overall_status, error, created_at, completed_at
";

/// PostgreSQL implementation of CheckRepository
#[derive(Clone)]
pub struct PgCheckRepository {
    pool: PgPool,
}

impl PgCheckRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckRepository for PgCheckRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ComplianceCheck>> {
        let result = sqlx::query_as::<_, CheckModel>(&format!(
            "SELECT {CHECK_COLUMNS} FROM compliance_checks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ComplianceCheck::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<ComplianceCheck>> {
        let limit = if limit <= 0 { 50 } else { limit };

        let result = sqlx::query_as::<_, CheckModel>(&format!(
            r"
            SELECT {CHECK_COLUMNS}
            FROM compliance_checks
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(owner_id)
        .bind(limit)
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.into_iter().map(ComplianceCheck::try_from).collect()
    }

    #[instrument(skip(self, check))]
    async fn create(&self, check: &ComplianceCheck) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO compliance_checks
                (id, owner_id, state_id, product_type, status, pass_count,
                 warning_count, fail_count, overall_status, error, created_at,
                 completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(check.id)
        .bind(check.owner_id)
        .bind(check.state_id)
        .bind(&check.product_type)
        .bind(check.status.as_str())
        .bind(check.pass_count)
        .bind(check.warning_count)
        .bind(check.fail_count)
        .bind(check.overall_status.map(|s| s.as_str()))
        .bind(&check.error)
        .bind(check.created_at)
        .bind(check.completed_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, check))]
    async fn update(&self, check: &ComplianceCheck) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE compliance_checks
            SET status = $2, pass_count = $3, warning_count = $4, fail_count = $5,
                overall_status = $6, error = $7, completed_at = $8
            WHERE id = $1
            ",
        )
        .bind(check.id)
        .bind(check.status.as_str())
        .bind(check.pass_count)
        .bind(check.warning_count)
        .bind(check.fail_count)
        .bind(check.overall_status.map(|s| s.as_str()))
        .bind(&check.error)
        .bind(check.completed_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(check_not_found(check.id));
        }

        Ok(())
    }
}
