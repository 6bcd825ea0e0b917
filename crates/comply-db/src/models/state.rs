//! State database model

use sqlx::FromRow;
use uuid::Uuid;

/// Database model for states table
#[derive(Debug, Clone, FromRow)]
pub struct StateModel {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub is_active: bool,
}
