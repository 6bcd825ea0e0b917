//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::{auth, checks, health, rules, sources, states, suggestions};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new()
        // API v1 endpoints
        .nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(state_routes())
        .merge(source_routes())
        .merge(rule_routes())
        .merge(suggestion_routes())
        .merge(check_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::current_user))
}

/// State routes
fn state_routes() -> Router<AppState> {
    Router::new()
        .route("/states", get(states::list_states))
        .route("/states", post(states::create_state))
        .route("/states/:state_id", get(states::get_state))
        .route("/states/:state_id", patch(states::update_state))
        .route("/states/:state_id/sources", get(sources::list_state_sources))
        .route("/states/:state_id/rules", get(rules::list_state_rules))
}

/// Regulatory source routes
fn source_routes() -> Router<AppState> {
    Router::new()
        .route("/sources", post(sources::create_source))
        .route("/sources/check", post(sources::run_source_checks))
        .route("/sources/:source_id", get(sources::get_source))
        .route("/sources/:source_id", patch(sources::update_source))
        .route("/sources/:source_id", delete(sources::delete_source))
        .route("/sources/:source_id/check", post(sources::check_source))
}

/// Compliance rule routes
fn rule_routes() -> Router<AppState> {
    Router::new()
        .route("/rules", post(rules::create_rule))
        .route("/rules/:rule_id", get(rules::get_rule))
        .route("/rules/:rule_id", patch(rules::update_rule))
        .route("/rules/:rule_id/activate", post(rules::activate_rule))
        .route("/rules/:rule_id/deactivate", post(rules::deactivate_rule))
        .route("/rules/:rule_id/history", get(rules::rule_history))
        .route("/audit/recent", get(rules::recent_audit))
}

/// Suggestion review routes
fn suggestion_routes() -> Router<AppState> {
    Router::new()
        .route("/suggestions", get(suggestions::list_suggestions))
        .route("/suggestions/pending/count", get(suggestions::pending_count))
        .route("/suggestions/:suggestion_id", get(suggestions::get_suggestion))
        .route(
            "/suggestions/:suggestion_id/approve",
            post(suggestions::approve_suggestion),
        )
        .route(
            "/suggestions/:suggestion_id/reject",
            post(suggestions::reject_suggestion),
        )
}

/// Compliance check routes
fn check_routes() -> Router<AppState> {
    Router::new()
        .route("/checks", post(checks::create_check))
        .route("/checks", get(checks::list_checks))
        .route("/checks/:check_id", get(checks::get_check))
        .route("/checks/:check_id/panels", post(checks::upload_panel))
        .route("/checks/:check_id/analyze", post(checks::analyze_check))
        .route("/checks/:check_id/report", get(checks::check_report))
}
