//! PostgreSQL implementation of StateRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use comply_core::traits::{RepoResult, StateRepository};
use comply_core::State;

use crate::models::StateModel;

use super::error::{map_db_error, state_not_found};

/// PostgreSQL implementation of StateRepository
#[derive(Clone)]
pub struct PgStateRepository {
    pool: PgPool,
}

impl PgStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateRepository for PgStateRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<State>> {
        let result = sqlx::query_as::<_, StateModel>(
            r"
            SELECT id, code, name, is_active
            FROM states
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(State::from))
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &str) -> RepoResult<Option<State>> {
        let result = sqlx::query_as::<_, StateModel>(
            r"
            SELECT id, code, name, is_active
            FROM states
            WHERE UPPER(code) = UPPER($1)
            ",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(State::from))
    }

    #[instrument(skip(self))]
    async fn list_active(&self) -> RepoResult<Vec<State>> {
        let result = sqlx::query_as::<_, StateModel>(
            r"
            SELECT id, code, name, is_active
            FROM states
            WHERE is_active = TRUE
            ORDER BY code
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.into_iter().map(State::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, state: &State) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO states (id, code, name, is_active)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(state.id)
        .bind(&state.code)
        .bind(&state.name)
        .bind(state.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update(&self, state: &State) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE states
            SET name = $2, is_active = $3
            WHERE id = $1
            ",
        )
        .bind(state.id)
        .bind(&state.name)
        .bind(state.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(state_not_found(state.id));
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
        assert_send_sync::<PgStateRepository>();
    }
}
