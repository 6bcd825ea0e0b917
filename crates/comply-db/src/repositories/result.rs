//! PostgreSQL implementation of ResultRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use comply_core::traits::{RepoResult, ResultRepository};
use comply_core::CheckResult;

use crate::models::CheckResultModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ResultRepository
#[derive(Clone)]
pub struct PgResultRepository {
    pool: PgPool,
}

impl PgResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultRepository for PgResultRepository {
    #[instrument(skip(self))]
    async fn find_by_check(&self, check_id: Uuid) -> RepoResult<Vec<CheckResult>> {
        let result = sqlx::query_as::<_, CheckResultModel>(
            r"
            SELECT id, check_id, rule_id, rule_name, status, found_value,
                   expected_value, explanation, created_at
            FROM check_results
            WHERE check_id = $1
            ORDER BY rule_name
            ",
        )
        .bind(check_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.into_iter().map(CheckResult::try_from).collect()
    }

    #[instrument(skip(self, results))]
    async fn create_batch(&self, results: &[CheckResult]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for r in results {
            sqlx::query(
                r"
                INSERT INTO check_results
                    (id, check_id, rule_id, rule_name, status, found_value,
                     expected_value, explanation, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ",
            )
            .bind(r.id)
            .bind(r.check_id)
            .bind(r.rule_id)
            .bind(&r.rule_name)
            .bind(r.status.as_str())
            .bind(&r.found_value)
            .bind(&r.expected_value)
            .bind(&r.explanation)
            .bind(r.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgResultRepository>();
    }
}
