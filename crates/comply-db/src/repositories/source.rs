//! PostgreSQL implementation of SourceRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use comply_core::traits::{RepoResult, SourceRepository};
use comply_core::RegulatorySource;

use crate::models::SourceModel;

use super::error::{map_db_error, source_not_found};

const SOURCE_COLUMNS: &str = r"
    id, state_id, source_name, source_url, content_hash, last_checked,
    last_content_change, check_frequency_days, is_active, created_at, updated_at
";

/// PostgreSQL implementation of SourceRepository
#[derive(Clone)]
pub struct PgSourceRepository {
    pool: PgPool,
}

impl PgSourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SourceRepository for PgSourceRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<RegulatorySource>> {
        let result = sqlx::query_as::<_, SourceModel>(&format!(
            "SELECT {SOURCE_COLUMNS} FROM regulatory_sources WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RegulatorySource::from))
    }

    #[instrument(skip(self))]
    async fn find_by_state(&self, state_id: Uuid) -> RepoResult<Vec<RegulatorySource>> {
        let result = sqlx::query_as::<_, SourceModel>(&format!(
            "SELECT {SOURCE_COLUMNS} FROM regulatory_sources WHERE state_id = $1 ORDER BY source_name"
        ))
        .bind(state_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.into_iter().map(RegulatorySource::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_active(&self) -> RepoResult<Vec<RegulatorySource>> {
        let result = sqlx::query_as::<_, SourceModel>(&format!(
            "SELECT {SOURCE_COLUMNS} FROM regulatory_sources WHERE is_active = TRUE ORDER BY state_id, source_name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.into_iter().map(RegulatorySource::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, source: &RegulatorySource) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO regulatory_sources
                (id, state_id, source_name, source_url, content_hash, last_checked,
                 last_content_change, check_frequency_days, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(source.id)
        .bind(source.state_id)
        .bind(&source.source_name)
        .bind(&source.source_url)
        .bind(&source.content_hash)
        .bind(source.last_checked)
        .bind(source.last_content_change)
        .bind(source.check_frequency_days)
        .bind(source.is_active)
        .bind(source.created_at)
        .bind(source.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update(&self, source: &RegulatorySource) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE regulatory_sources
            SET source_name = $2, source_url = $3, check_frequency_days = $4,
                is_active = $5, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(source.id)
        .bind(&source.source_name)
        .bind(&source.source_url)
        .bind(source.check_frequency_days)
        .bind(source.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(source_not_found(source.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_check(
        &self,
        id: Uuid,
        checked_at: DateTime<Utc>,
        new_hash: Option<&str>,
    ) -> RepoResult<()> {
        // When the hash moved, store it and stamp last_content_change too
        let result = sqlx::query(
            r"
            UPDATE regulatory_sources
            SET last_checked = $2,
                content_hash = COALESCE($3, content_hash),
                last_content_change = CASE WHEN $3 IS NOT NULL THEN $2 ELSE last_content_change END,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(checked_at)
        .bind(new_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(source_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE regulatory_sources
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(source_not_found(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgSourceRepository>();
    }
}
