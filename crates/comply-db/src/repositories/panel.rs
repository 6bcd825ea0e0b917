//! PostgreSQL implementation of PanelRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use comply_core::traits::{PanelRepository, RepoResult};
use comply_core::PanelUpload;

use crate::models::PanelModel;

use super::error::{map_db_error, panel_not_found};

const PANEL_COLUMNS: &str = r"
    id, check_id, panel_type, object_key, content_type, extraction,
    flagged_for_review, flag_reasons, created_at
";

/// PostgreSQL implementation of PanelRepository
#[derive(Clone)]
pub struct PgPanelRepository {
    pool: PgPool,
}

impl PgPanelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PanelRepository for PgPanelRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<PanelUpload>> {
        let result = sqlx::query_as::<_, PanelModel>(&format!(
            "SELECT {PANEL_COLUMNS} FROM panel_uploads WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(PanelUpload::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_check(&self, check_id: Uuid) -> RepoResult<Vec<PanelUpload>> {
        let result = sqlx::query_as::<_, PanelModel>(&format!(
            "SELECT {PANEL_COLUMNS} FROM panel_uploads WHERE check_id = $1 ORDER BY created_at"
        ))
        .bind(check_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.into_iter().map(PanelUpload::try_from).collect()
    }

    #[instrument(skip(self, panel))]
    async fn create(&self, panel: &PanelUpload) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO panel_uploads
                (id, check_id, panel_type, object_key, content_type, extraction,
                 flagged_for_review, flag_reasons, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(panel.id)
        .bind(panel.check_id)
        .bind(panel.panel_type.as_str())
        .bind(&panel.object_key)
        .bind(&panel.content_type)
        .bind(&panel.extraction)
        .bind(panel.flagged_for_review)
        .bind(&panel.flag_reasons)
        .bind(panel.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, panel))]
    async fn update_extraction(&self, panel: &PanelUpload) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE panel_uploads
            SET extraction = $2, flagged_for_review = $3, flag_reasons = $4
            WHERE id = $1
            ",
        )
        .bind(panel.id)
        .bind(&panel.extraction)
        .bind(panel.flagged_for_review)
        .bind(&panel.flag_reasons)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(panel_not_found(panel.id));
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
        assert_send_sync::<PgPanelRepository>();
    }
}
