//! User entity <-> model mapper

use comply_core::{DomainError, User};

use super::bad_enum;
use crate::models::UserModel;

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            role: model.role.parse().map_err(bad_enum)?,
            is_active: model.is_active,
            created_at: model.created_at,
        })
    }
}
