//! Request extractors
//!
//! Custom Axum extractors for authentication, validation, and pagination.

pub mod auth;
pub mod pagination;
pub mod validated;

pub use auth::AuthUser;
pub use pagination::PaginationParams;
pub use validated::{OptionalValidatedJson, ValidatedJson};
