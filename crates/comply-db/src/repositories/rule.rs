//! PostgreSQL implementation of RuleRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use comply_core::traits::{RepoResult, RuleRepository};
use comply_core::{ComplianceRule, DomainError};

use crate::models::RuleModel;

use super::error::{map_db_error, rule_not_found};

const RULE_COLUMNS: &str = r"
    id, state_id, name, description, category, severity, citation, source_url,
    source_type, product_types, validation_prompt, is_active, version,
    created_at, updated_at
";

/// PostgreSQL implementation of RuleRepository
#[derive(Clone)]
pub struct PgRuleRepository {
    pool: PgPool,
}

impl PgRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RuleRepository for PgRuleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ComplianceRule>> {
        let result = sqlx::query_as::<_, RuleModel>(&format!(
            "SELECT {RULE_COLUMNS} FROM compliance_rules WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ComplianceRule::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_active_by_state(&self, state_id: Uuid) -> RepoResult<Vec<ComplianceRule>> {
        let result = sqlx::query_as::<_, RuleModel>(&format!(
            "SELECT {RULE_COLUMNS} FROM compliance_rules WHERE state_id = $1 AND is_active = TRUE ORDER BY name"
        ))
        .bind(state_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        result
            .into_iter()
            .map(ComplianceRule::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn find_by_state(&self, state_id: Uuid) -> RepoResult<Vec<ComplianceRule>> {
        let result = sqlx::query_as::<_, RuleModel>(&format!(
            "SELECT {RULE_COLUMNS} FROM compliance_rules WHERE state_id = $1 ORDER BY name"
        ))
        .bind(state_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        result
            .into_iter()
            .map(ComplianceRule::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn create(&self, rule: &ComplianceRule) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO compliance_rules
                (id, state_id, name, description, category, severity, citation,
                 source_url, source_type, product_types, validation_prompt,
                 is_active, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ",
        )
        .bind(rule.id)
        .bind(rule.state_id)
        .bind(&rule.name)
        .bind(&rule.description)
        .bind(rule.category.as_str())
        .bind(rule.severity.as_str())
        .bind(&rule.citation)
        .bind(&rule.source_url)
        .bind(rule.source_type.as_str())
        .bind(&rule.product_types)
        .bind(&rule.validation_prompt)
        .bind(rule.is_active)
        .bind(rule.version)
        .bind(rule.created_at)
        .bind(rule.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, rule))]
    async fn update_with_version(
        &self,
        rule: &ComplianceRule,
        expected_version: i32,
    ) -> RepoResult<()> {
        // Conditional write: only lands when nobody else bumped the version
        let result = sqlx::query(
            r"
            UPDATE compliance_rules
            SET name = $2, description = $3, category = $4, severity = $5,
                citation = $6, source_url = $7, source_type = $8,
                product_types = $9, validation_prompt = $10, is_active = $11,
                version = $12, updated_at = NOW()
            WHERE id = $1 AND version = $13
            ",
        )
        .bind(rule.id)
        .bind(&rule.name)
        .bind(&rule.description)
        .bind(rule.category.as_str())
        .bind(rule.severity.as_str())
        .bind(&rule.citation)
        .bind(&rule.source_url)
        .bind(rule.source_type.as_str())
        .bind(&rule.product_types)
        .bind(&rule.validation_prompt)
        .bind(rule.is_active)
        .bind(rule.version)
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            // Distinguish a missing rule from a version race
            let current = sqlx::query_scalar::<_, i32>(
                "SELECT version FROM compliance_rules WHERE id = $1",
            )
            .bind(rule.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            return Err(match current {
                Some(actual) => DomainError::VersionConflict {
                    expected: expected_version,
                    actual,
                },
                None => rule_not_found(rule.id),
            });
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_active(&self, id: Uuid, is_active: bool) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE compliance_rules
            SET is_active = $2, version = version + 1, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(is_active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(rule_not_found(id));
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
        assert_send_sync::<PgRuleRepository>();
    }
}
