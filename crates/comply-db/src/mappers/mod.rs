//! Model -> entity mappers
//!
//! Enum columns are stored as TEXT, so conversion can fail on rows written
//! by a newer schema. Those failures surface as internal errors rather
//! than panics.

mod audit;
mod check;
mod rule;
mod source;
mod state;
mod suggestion;
mod user;

use comply_core::{DomainError, EnumParseError};

pub(crate) fn bad_enum(e: EnumParseError) -> DomainError {
    DomainError::InternalError(format!("corrupt enum column: {e}"))
}
