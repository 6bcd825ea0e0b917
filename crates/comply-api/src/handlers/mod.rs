//! Request handlers
//!
//! HTTP handlers organized by domain.

pub mod auth;
pub mod checks;
pub mod health;
pub mod rules;
pub mod sources;
pub mod states;
pub mod suggestions;
