//! Data transfer objects
//!
//! Requests carry validated input into the service layer; responses shape
//! entities for JSON output. Mappers convert between entities and DTOs.

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
