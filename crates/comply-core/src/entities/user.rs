//! User entity - check owners and reviewing administrators

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::UserRole;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Uuid, email: String, display_name: String, role: UserRole) -> Self {
        Self {
            id,
            email,
            display_name,
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
