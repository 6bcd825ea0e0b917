//! PostgreSQL implementation of SuggestionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use comply_core::traits::{RepoResult, SuggestionQuery, SuggestionRepository};
use comply_core::RuleChangeSuggestion;

use crate::models::SuggestionModel;

use super::error::{map_db_error, suggestion_not_found};

const SUGGESTION_COLUMNS: &str = r"
    id, state_id, source_id, existing_rule_id, change_type, suggested_name,
    suggested_description, suggested_category, suggested_severity,
    suggested_citation, suggested_source_url, ai_reasoning, source_excerpt,
    status, reviewed_by, reviewed_at, review_notes, created_at
";

/// PostgreSQL implementation of SuggestionRepository
#[derive(Clone)]
pub struct PgSuggestionRepository {
    pool: PgPool,
}

impl PgSuggestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuggestionRepository for PgSuggestionRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<RuleChangeSuggestion>> {
        let result = sqlx::query_as::<_, SuggestionModel>(&format!(
            "SELECT {SUGGESTION_COLUMNS} FROM rule_change_suggestions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(RuleChangeSuggestion::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find(&self, query: SuggestionQuery) -> RepoResult<Vec<RuleChangeSuggestion>> {
        let limit = if query.limit <= 0 { 50 } else { query.limit };

        let result = sqlx::query_as::<_, SuggestionModel>(&format!(
            r"
            SELECT {SUGGESTION_COLUMNS}
            FROM rule_change_suggestions
            WHERE ($1::uuid IS NULL OR state_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "
        ))
        .bind(query.state_id)
        .bind(query.status.map(|s| s.as_str()))
        .bind(limit)
        .bind(query.offset.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        result
            .into_iter()
            .map(RuleChangeSuggestion::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn has_pending(&self, state_id: Uuid, suggested_name: &str) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM rule_change_suggestions
                WHERE state_id = $1
                  AND LOWER(suggested_name) = LOWER($2)
                  AND status = 'pending'
            )
            ",
        )
        .bind(state_id)
        .bind(suggested_name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, suggestion))]
    async fn create(&self, suggestion: &RuleChangeSuggestion) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO rule_change_suggestions
                (id, state_id, source_id, existing_rule_id, change_type,
                 suggested_name, suggested_description, suggested_category,
                 suggested_severity, suggested_citation, suggested_source_url,
                 ai_reasoning, source_excerpt, status, reviewed_by, reviewed_at,
                 review_notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18)
            ",
        )
        .bind(suggestion.id)
        .bind(suggestion.state_id)
        .bind(suggestion.source_id)
        .bind(suggestion.existing_rule_id)
        .bind(suggestion.change_type.as_str())
        .bind(&suggestion.suggested_name)
        .bind(&suggestion.suggested_description)
        .bind(suggestion.suggested_category.map(|c| c.as_str()))
        .bind(suggestion.suggested_severity.map(|s| s.as_str()))
        .bind(&suggestion.suggested_citation)
        .bind(&suggestion.suggested_source_url)
        .bind(&suggestion.ai_reasoning)
        .bind(&suggestion.source_excerpt)
        .bind(suggestion.status.as_str())
        .bind(suggestion.reviewed_by)
        .bind(suggestion.reviewed_at)
        .bind(&suggestion.review_notes)
        .bind(suggestion.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, suggestion))]
    async fn update(&self, suggestion: &RuleChangeSuggestion) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE rule_change_suggestions
            SET status = $2, reviewed_by = $3, reviewed_at = $4, review_notes = $5
            WHERE id = $1
            ",
        )
        .bind(suggestion.id)
        .bind(suggestion.status.as_str())
        .bind(suggestion.reviewed_by)
        .bind(suggestion.reviewed_at)
        .bind(&suggestion.review_notes)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(suggestion_not_found(suggestion.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_pending(&self, state_id: Option<Uuid>) -> RepoResult<i64> {
        let result = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM rule_change_suggestions
            WHERE status = 'pending'
              AND ($1::uuid IS NULL OR state_id = $1)
            ",
        )
        .bind(state_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgSuggestionRepository>();
    }
}
