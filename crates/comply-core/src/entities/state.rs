//! State entity - a jurisdiction with a tracked regulatory program

use uuid::Uuid;

use crate::value_objects::Jurisdiction;

/// State entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub id: Uuid,
    /// Two-letter code, e.g. "MT"
    pub code: String,
    pub name: String,
    pub is_active: bool,
}

impl State {
    pub fn new(id: Uuid, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into().to_uppercase(),
            name: name.into(),
            is_active: true,
        }
    }

    /// Jurisdiction value for citation resolution
    pub fn jurisdiction(&self) -> Jurisdiction {
        Jurisdiction::from_code(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_jurisdiction() {
        let state = State::new(Uuid::new_v4(), "mt", "Montana");
        assert_eq!(state.code, "MT");
        assert_eq!(state.jurisdiction(), Jurisdiction::Montana);
    }
}
