//! # comply-api
//!
//! REST API server for the label compliance platform. Exposes the service
//! layer over HTTP with JWT authentication, validation, rate limiting, and
//! a background scheduler for regulatory source checks.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod scheduler;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
