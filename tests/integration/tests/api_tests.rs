//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance with migrations applied
//! - Environment variable: DATABASE_URL
//!
//! Analysis endpoints that call outbound AI providers are not exercised here;
//! provider clients point at a dead address and stay untouched.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use anyhow::Result;
use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, promote_to_admin, TestServer,
};
use reqwest::StatusCode;

// ============================================================================
// Setup helpers
// ============================================================================

/// Register a fresh member user and return their auth response
async fn register_user(server: &TestServer) -> Result<AuthResponse> {
    let request = RegisterRequest::unique();
    let response = server.post("/api/v1/auth/register", &request).await?;
    assert_json(response, StatusCode::CREATED).await
}

/// Register a fresh user and promote them to admin
///
/// The admin check reads the stored role on every request, so the original
/// token keeps working after promotion.
async fn register_admin(server: &TestServer) -> Result<AuthResponse> {
    let request = RegisterRequest::unique();
    let response = server.post("/api/v1/auth/register", &request).await?;
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await?;
    promote_to_admin(&request.email).await?;
    Ok(auth)
}

/// Create a state, retrying on code collisions with the persistent test DB
async fn create_state(server: &TestServer, admin_token: &str) -> Result<StateResponse> {
    for _ in 0..5 {
        let request = CreateStateRequest::unique();
        let response = server
            .post_auth("/api/v1/states", admin_token, &request)
            .await?;
        if response.status() == StatusCode::CONFLICT {
            continue;
        }
        return assert_json(response, StatusCode::CREATED).await;
    }
    anyhow::bail!("Could not find a free state code after 5 attempts")
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth.user.email, request.email);
    assert_eq!(auth.user.role, "member");
    assert_eq!(auth.token_type, "Bearer");
    assert!(auth.expires_in > 0);
    assert!(!auth.access_token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    // First registration
    server.post("/api/v1/auth/register", &request).await.unwrap();

    // Second registration with same email
    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_login() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    // Register first
    let register_req = RegisterRequest::unique();
    server
        .post("/api/v1/auth/register", &register_req)
        .await
        .unwrap();

    // Login
    let login_req = LoginRequest::from_register(&register_req);
    let response = server.post("/api/v1/auth/login", &login_req).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(auth.user.email, register_req.email);
    assert!(!auth.access_token.is_empty());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let login_req = LoginRequest {
        email: "nonexistent@example.com".to_string(),
        password: "wrongpass".to_string(),
    };

    let response = server.post("/api/v1/auth/login", &login_req).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_current_user() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await.unwrap();

    let response = server
        .get_auth("/api/v1/auth/me", &auth.access_token)
        .await
        .unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(user.id, auth.user.id);
    assert_eq!(user.email, auth.user.email);
}

#[tokio::test]
async fn test_get_current_user_unauthorized() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/auth/me").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
}

// ============================================================================
// State Tests
// ============================================================================

#[tokio::test]
async fn test_create_state_requires_admin() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let member = register_user(&server).await.unwrap();

    let request = CreateStateRequest::unique();
    let response = server
        .post_auth("/api/v1/states", &member.access_token, &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_create_and_get_state() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();

    let state = create_state(&server, &admin.access_token).await.unwrap();
    assert!(state.is_active);
    assert_eq!(state.code.len(), 2);

    let response = server
        .get_auth(&format!("/api/v1/states/{}", state.id), &admin.access_token)
        .await
        .unwrap();
    let fetched: StateResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.id, state.id);
    assert_eq!(fetched.code, state.code);
}

#[tokio::test]
async fn test_update_state() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();

    let update = UpdateStateRequest {
        name: Some("Renamed State".to_string()),
        is_active: None,
    };
    let response = server
        .patch_auth(
            &format!("/api/v1/states/{}", state.id),
            &admin.access_token,
            &update,
        )
        .await
        .unwrap();
    let updated: StateResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(updated.name, "Renamed State");
}

// ============================================================================
// Source Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_list_sources() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();

    let request = CreateSourceRequest::unique(state.id);
    let response = server
        .post_auth("/api/v1/sources", &admin.access_token, &request)
        .await
        .unwrap();
    let source: SourceResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(source.state_id, state.id);
    assert_eq!(source.check_frequency_days, 7);
    assert!(source.content_hash.is_none());

    let response = server
        .get_auth(
            &format!("/api/v1/states/{}/sources", state.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let sources: Vec<SourceResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(sources.iter().any(|s| s.id == source.id));
}

#[tokio::test]
async fn test_delete_source() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();

    let request = CreateSourceRequest::unique(state.id);
    let response = server
        .post_auth("/api/v1/sources", &admin.access_token, &request)
        .await
        .unwrap();
    let source: SourceResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .delete_auth(
            &format!("/api/v1/sources/{}", source.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // Soft deleted sources drop out of the state listing
    let response = server
        .get_auth(
            &format!("/api/v1/states/{}/sources", state.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let sources: Vec<SourceResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!sources.iter().any(|s| s.id == source.id));
}

#[tokio::test]
async fn test_run_source_checks_reports_scrape_failures() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();

    let request = CreateSourceRequest::unique(state.id);
    let response = server
        .post_auth("/api/v1/sources", &admin.access_token, &request)
        .await
        .unwrap();
    let source: SourceResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // The test scrape provider points at a dead address, so the run
    // completes with a per-source fetch failure instead of an HTTP error
    let run = RunChecksRequest {
        source_id: Some(source.id),
        ..Default::default()
    };
    let response = server
        .post_auth("/api/v1/sources/check", &admin.access_token, &run)
        .await
        .unwrap();
    let summary: CheckRunSummary = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(summary.checked, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.no_changes, 0);
    assert_eq!(summary.changed, 0);
    assert_eq!(summary.suggestions_created, 0);

    assert_eq!(summary.outcomes.len(), 1);
    assert_eq!(summary.outcomes[0].source_id, source.id);
    assert_eq!(summary.outcomes[0].status, "scrape_error");
    assert!(summary.outcomes[0].error.is_some());
}

#[tokio::test]
async fn test_run_source_checks_requires_admin() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let member = register_user(&server).await.unwrap();

    let run = RunChecksRequest::default();
    let response = server
        .post_auth("/api/v1/sources/check", &member.access_token, &run)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Rule Tests
// ============================================================================

#[tokio::test]
async fn test_create_rule_and_audit_trail() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();

    let request = CreateRuleRequest::unique(state.id);
    let response = server
        .post_auth("/api/v1/rules", &admin.access_token, &request)
        .await
        .unwrap();
    let rule: RuleResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(rule.state_id, state.id);
    assert_eq!(rule.source_type, "internal");
    assert_eq!(rule.version, 1);
    assert!(rule.is_active);

    // Creation is recorded in the audit log
    let response = server
        .get_auth(
            &format!("/api/v1/rules/{}/history", rule.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let history: Vec<AuditEntryResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, "created");
    assert_eq!(history[0].changed_by, Some(admin.user.id));
}

#[tokio::test]
async fn test_update_rule_version_conflict() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();

    let request = CreateRuleRequest::unique(state.id);
    let response = server
        .post_auth("/api/v1/rules", &admin.access_token, &request)
        .await
        .unwrap();
    let rule: RuleResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // First update against version 1 succeeds
    let update = UpdateRuleRequest {
        name: Some("Updated rule name".to_string()),
        description: None,
        expected_version: rule.version,
        reason: Some("clarifying the requirement".to_string()),
    };
    let response = server
        .patch_auth(
            &format!("/api/v1/rules/{}", rule.id),
            &admin.access_token,
            &update,
        )
        .await
        .unwrap();
    let updated: RuleResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.version, rule.version + 1);

    // Second update against the stale version is rejected
    let stale = UpdateRuleRequest {
        name: Some("Stale update".to_string()),
        description: None,
        expected_version: rule.version,
        reason: None,
    };
    let response = server
        .patch_auth(
            &format!("/api/v1/rules/{}", rule.id),
            &admin.access_token,
            &stale,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_deactivate_rule() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();

    let request = CreateRuleRequest::unique(state.id);
    let response = server
        .post_auth("/api/v1/rules", &admin.access_token, &request)
        .await
        .unwrap();
    let rule: RuleResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth_empty(
            &format!("/api/v1/rules/{}/deactivate", rule.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let deactivated: RuleResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!deactivated.is_active);

    // Inactive rules disappear from the default listing
    let response = server
        .get_auth(
            &format!("/api/v1/states/{}/rules", state.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let rules: Vec<RuleResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!rules.iter().any(|r| r.id == rule.id));

    // But remain visible with include_inactive
    let response = server
        .get_auth(
            &format!("/api/v1/states/{}/rules?include_inactive=true", state.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let rules: Vec<RuleResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(rules.iter().any(|r| r.id == rule.id));
}

// ============================================================================
// Suggestion Tests
// ============================================================================

#[tokio::test]
async fn test_list_suggestions_and_pending_count() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();

    // A fresh state has nothing pending
    let response = server
        .get_auth(
            &format!("/api/v1/suggestions?state_id={}", state.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let suggestions: Vec<serde_json::Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(suggestions.is_empty());

    let response = server
        .get_auth(
            &format!("/api/v1/suggestions/pending/count?state_id={}", state.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let count: PendingCountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(count.count, 0);
}

#[tokio::test]
async fn test_approve_new_suggestion_creates_rule() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();
    let suggestion_id = integration_tests::seed_suggestion(state.id, "new", None)
        .await
        .unwrap();

    let review = ReviewRequest {
        notes: Some("Matches the published rule text".to_string()),
    };
    let response = server
        .post_auth(
            &format!("/api/v1/suggestions/{suggestion_id}/approve"),
            &admin.access_token,
            &review,
        )
        .await
        .unwrap();
    let approved: SuggestionResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(approved.status, "approved");
    assert_eq!(approved.reviewed_by, Some(admin.user.id));

    // The approved suggestion materializes as a fresh regulatory rule
    let response = server
        .get_auth(
            &format!("/api/v1/states/{}/rules", state.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let rules: Vec<RuleResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let rule = rules
        .iter()
        .find(|r| r.name == approved.suggested_name)
        .expect("approved rule should exist");
    assert_eq!(rule.version, 1);
    assert_eq!(rule.source_type, "regulatory");

    // With an audit entry linking back to the suggestion
    let response = server
        .get_auth(
            &format!("/api/v1/rules/{}/history", rule.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let history: Vec<AuditEntryResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, "created");
    assert_eq!(history[0].suggestion_id, Some(suggestion_id));
    // Reviewer notes are kept as the reason for the change
    assert_eq!(
        history[0].change_reason.as_deref(),
        Some("Matches the published rule text")
    );
}

#[tokio::test]
async fn test_approve_deprecation_without_notes_keeps_analyzer_reasoning() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();

    let request = CreateRuleRequest::unique(state.id);
    let response = server
        .post_auth("/api/v1/rules", &admin.access_token, &request)
        .await
        .unwrap();
    let rule: RuleResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let suggestion_id = integration_tests::seed_suggestion(state.id, "deprecate", Some(rule.id))
        .await
        .unwrap();

    // Approve without notes
    let review = ReviewRequest { notes: None };
    let response = server
        .post_auth(
            &format!("/api/v1/suggestions/{suggestion_id}/approve"),
            &admin.access_token,
            &review,
        )
        .await
        .unwrap();
    let approved: SuggestionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(approved.status, "approved");

    // The rule is deactivated
    let response = server
        .get_auth(
            &format!("/api/v1/states/{}/rules?include_inactive=true", state.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let rules: Vec<RuleResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let deprecated = rules.iter().find(|r| r.id == rule.id).unwrap();
    assert!(!deprecated.is_active);

    // Absent reviewer notes, the analyzer's reasoning becomes the audit reason
    let response = server
        .get_auth(
            &format!("/api/v1/rules/{}/history", rule.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let history: Vec<AuditEntryResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let entry = history
        .iter()
        .find(|e| e.action == "deactivated")
        .expect("deactivation should be audited");
    assert_eq!(entry.suggestion_id, Some(suggestion_id));
    assert_eq!(
        entry.change_reason.as_deref(),
        Some("The page now requires this warning")
    );
}

#[tokio::test]
async fn test_reject_suggestion_is_terminal() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();
    let suggestion_id = integration_tests::seed_suggestion(state.id, "new", None)
        .await
        .unwrap();

    let review = ReviewRequest { notes: None };
    let response = server
        .post_auth(
            &format!("/api/v1/suggestions/{suggestion_id}/reject"),
            &admin.access_token,
            &review,
        )
        .await
        .unwrap();
    let rejected: SuggestionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(rejected.status, "rejected");

    // Rejection creates no rule
    let response = server
        .get_auth(
            &format!("/api/v1/states/{}/rules", state.id),
            &admin.access_token,
        )
        .await
        .unwrap();
    let rules: Vec<RuleResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!rules.iter().any(|r| r.name == rejected.suggested_name));

    // And the decision is final
    let response = server
        .post_auth(
            &format!("/api/v1/suggestions/{suggestion_id}/approve"),
            &admin.access_token,
            &review,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_review_requires_admin() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();
    let member = register_user(&server).await.unwrap();
    let suggestion_id = integration_tests::seed_suggestion(state.id, "new", None)
        .await
        .unwrap();

    let review = ReviewRequest { notes: None };
    let response = server
        .post_auth(
            &format!("/api/v1/suggestions/{suggestion_id}/approve"),
            &member.access_token,
            &review,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_list_suggestions_bad_status() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = register_user(&server).await.unwrap();

    let response = server
        .get_auth("/api/v1/suggestions?status=bogus", &user.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Check Tests
// ============================================================================

#[tokio::test]
async fn test_create_check_and_upload_panel() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();
    let member = register_user(&server).await.unwrap();

    // Create check
    let request = CreateCheckRequest {
        state_id: state.id,
        product_type: "Flower".to_string(),
    };
    let response = server
        .post_auth("/api/v1/checks", &member.access_token, &request)
        .await
        .unwrap();
    let check: CheckResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(check.status, "pending");
    // Product type is normalized on the way in
    assert_eq!(check.product_type, "flower");

    // Upload a front panel
    let response = server
        .post_panel(
            &format!("/api/v1/checks/{}/panels", check.id),
            &member.access_token,
            "front",
            "image/png",
            tiny_png(),
        )
        .await
        .unwrap();
    let panel: PanelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(panel.check_id, check.id);
    assert_eq!(panel.panel_type, "front");
    assert_eq!(panel.content_type, "image/png");
}

#[tokio::test]
async fn test_upload_panel_rejects_bad_content_type() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();
    let member = register_user(&server).await.unwrap();

    let request = CreateCheckRequest {
        state_id: state.id,
        product_type: "edible".to_string(),
    };
    let response = server
        .post_auth("/api/v1/checks", &member.access_token, &request)
        .await
        .unwrap();
    let check: CheckResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_panel(
            &format!("/api/v1/checks/{}/panels", check.id),
            &member.access_token,
            "front",
            "application/pdf",
            tiny_png(),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_analyze_without_panels_rejected() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();
    let member = register_user(&server).await.unwrap();

    let request = CreateCheckRequest {
        state_id: state.id,
        product_type: "tincture".to_string(),
    };
    let response = server
        .post_auth("/api/v1/checks", &member.access_token, &request)
        .await
        .unwrap();
    let check: CheckResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth_empty(
            &format!("/api/v1/checks/{}/analyze", check.id),
            &member.access_token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_checks_are_private_to_owner() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();
    let owner = register_user(&server).await.unwrap();
    let other = register_user(&server).await.unwrap();

    let request = CreateCheckRequest {
        state_id: state.id,
        product_type: "flower".to_string(),
    };
    let response = server
        .post_auth("/api/v1/checks", &owner.access_token, &request)
        .await
        .unwrap();
    let check: CheckResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Another user sees 404, not 403, so check existence is not leaked
    let response = server
        .get_auth(&format!("/api/v1/checks/{}", check.id), &other.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_list_checks_pagination() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();
    let member = register_user(&server).await.unwrap();

    for product in ["flower", "edible", "tincture"] {
        let request = CreateCheckRequest {
            state_id: state.id,
            product_type: product.to_string(),
        };
        server
            .post_auth("/api/v1/checks", &member.access_token, &request)
            .await
            .unwrap();
    }

    let response = server
        .get_auth("/api/v1/checks?limit=2", &member.access_token)
        .await
        .unwrap();
    let page: PaginatedChecks = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(page.data.len(), 2);
    assert_eq!(page.pagination.limit, 2);
    assert!(page.pagination.has_more);
}

#[tokio::test]
async fn test_check_report_csv() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = register_admin(&server).await.unwrap();
    let state = create_state(&server, &admin.access_token).await.unwrap();
    let member = register_user(&server).await.unwrap();

    let request = CreateCheckRequest {
        state_id: state.id,
        product_type: "flower".to_string(),
    };
    let response = server
        .post_auth("/api/v1/checks", &member.access_token, &request)
        .await
        .unwrap();
    let check: CheckResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/checks/{}/report", check.id),
            &member.access_token,
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("attachment"));

    let body = response.text().await.unwrap();
    assert!(body.starts_with("rule_name,status"));

    // Exports are also persisted under the check's storage prefix
    let stored = std::env::temp_dir()
        .join("labelproof-integration-uploads")
        .join(member.user.id.to_string())
        .join(check.id.to_string())
        .join("report.csv");
    let stored_body = tokio::fs::read_to_string(&stored)
        .await
        .expect("report should be persisted to the object store");
    assert_eq!(stored_body, body);
}
