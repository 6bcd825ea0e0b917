//! State entity <-> model mapper

use comply_core::State;

use crate::models::StateModel;

impl From<StateModel> for State {
    fn from(model: StateModel) -> Self {
        State {
            id: model.id,
            code: model.code,
            name: model.name,
            is_active: model.is_active,
        }
    }
}
