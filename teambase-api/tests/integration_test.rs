/// Integration tests for the Teambase API
///
/// These tests verify the full system works end-to-end:
/// - Signup, login, session, and logout flows
/// - Blocked-account token revocation
/// - Transactional team creation
/// - Generic admin listing, detail, and update
///
/// They require a running PostgreSQL instance reachable through
/// `DATABASE_URL`.

mod common;

use axum::http::StatusCode;
use common::{send, unique_suffix, TestContext};
use serde_json::json;
use teambase_api::app::{build_router, AppState};
use teambase_shared::account::{self, NewAccount};
use teambase_shared::models::user::{User, UserStatus, ROLE_MEMBER};

#[tokio::test]
async fn test_signup_and_login_flow() {
    let ctx = TestContext::new().await.unwrap();
    let email = format!("flow-{}@example.com", unique_suffix());

    // Signup
    let (status, body) = send(
        &ctx.app,
        "POST",
        "/v1/signup",
        None,
        Some(json!({ "email": email, "password": "test-password-123", "name": "Flow" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["email"], email);
    let new_user_id = body["id"].as_i64().unwrap();

    // Login issues a token
    let (status, body) = send(
        &ctx.app,
        "POST",
        "/v1/login",
        None,
        Some(json!({ "email": email, "password": "test-password-123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let token = body["login_token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 64);

    // Token resolves to the same user
    let (status, body) = send(&ctx.app, "GET", "/v1/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_i64().unwrap(), new_user_id);

    // Password hash never leaves the server
    assert!(body.get("password_hash").is_none());

    User::delete(&ctx.db, new_user_id, true).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_signup_refuses_taken_email() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(
        &ctx.app,
        "POST",
        "/v1/signup",
        None,
        Some(json!({ "email": ctx.user.email, "password": "another-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_create_user_honors_role_and_status() {
    let ctx = TestContext::new().await.unwrap();
    let email = format!("blocked-{}@example.com", unique_suffix());

    // Provision a blocked member through the canonical flow
    let user = account::create_user(
        &ctx.db,
        NewAccount {
            name: None,
            email: email.clone(),
            password: "test-password-123".to_string(),
            role: ROLE_MEMBER.to_string(),
            status: UserStatus::Blocked,
        },
    )
    .await
    .unwrap()
    .expect("email should be available");

    assert_eq!(user.role, ROLE_MEMBER);
    assert_eq!(user.status, UserStatus::Blocked);

    // The blocked account cannot log in even with the right password
    let (status, _) = send(
        &ctx.app,
        "POST",
        "/v1/login",
        None,
        Some(json!({ "email": email, "password": "test-password-123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    User::delete(&ctx.db, user.id, true).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/v1/login",
        None,
        Some(json!({ "email": ctx.user.email, "password": "wrong-password-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = send(&ctx.app, "GET", "/v1/session", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&ctx.app, "GET", "/v1/session", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_options_requests_bypass_the_gate() {
    let ctx = TestContext::new().await.unwrap();

    // CORS pre-flight must not be challenged for credentials; the router
    // answers for the method itself (405 here, no OPTIONS handler), never 401
    let (status, _) = send(&ctx.app, "OPTIONS", "/v1/session", None, None).await;
    assert_ne!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_auth_disabled_bypasses_the_gate() {
    let ctx = TestContext::new().await.unwrap();

    let mut config = ctx.config.clone();
    config.auth.login_disabled = true;
    let app = build_router(AppState::new(ctx.db.clone(), config));

    // Admin screens open up without a token (development mode)
    let (status, _) = send(&app, "GET", "/v1/admin", None, None).await;
    assert_eq!(status, StatusCode::OK);

    // Endpoints that act on behalf of a user still need one
    let (status, _) = send(&app, "GET", "/v1/session", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_blocked_account_token_is_cleared() {
    let ctx = TestContext::new().await.unwrap();

    // Token works while active
    let (status, _) = send(&ctx.app, "GET", "/v1/session", Some(&ctx.user_token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Block the account; the existing token must stop working
    User::update_status(&ctx.db, ctx.user.id, UserStatus::Blocked)
        .await
        .unwrap();
    let (status, _) = send(&ctx.app, "GET", "/v1/session", Some(&ctx.user_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The stale token was cleared, so unblocking does not revive it
    let user = User::find_by_id(&ctx.db, ctx.user.id).await.unwrap().unwrap();
    assert!(user.login_token.is_none());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/v1/logout",
        Some(&ctx.user_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&ctx.app, "GET", "/v1/session", Some(&ctx.user_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_create_team_creates_membership() {
    let ctx = TestContext::new().await.unwrap();
    let team_name = format!("Team {}", unique_suffix());

    let (status, body) = send(
        &ctx.app,
        "POST",
        "/v1/teams",
        Some(&ctx.user_token),
        Some(json!({ "name": team_name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["creator_id"].as_i64().unwrap(), ctx.user.id);
    assert_eq!(body["owner_id"].as_i64().unwrap(), ctx.user.id);
    let team_id = body["id"].as_i64().unwrap();

    // Creator joined as first member in the same transaction
    let member = teambase_shared::models::team_member::TeamMember::find(
        &ctx.db, team_id, ctx.user.id,
    )
    .await
    .unwrap();
    assert!(member.is_some());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_create_team_rolls_back_on_failure() {
    let ctx = TestContext::new().await.unwrap();
    let team_name = format!("Orphan {}", unique_suffix());

    // A creator that references no user fails the membership insert; the
    // team insert must roll back with it.
    let result = account::create_team(&ctx.db, &team_name, i64::MAX).await;
    assert!(result.is_err());

    let team = teambase_shared::models::team::Team::find_by_name(&ctx.db, &team_name)
        .await
        .unwrap();
    assert!(team.is_none());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_add_member_refuses_duplicates() {
    let ctx = TestContext::new().await.unwrap();
    let team = account::create_team(&ctx.db, &format!("Dup {}", unique_suffix()), ctx.user.id)
        .await
        .unwrap();

    // First add succeeds
    let (status, body) = send(
        &ctx.app,
        "POST",
        &format!("/v1/teams/{}/members", team.id),
        Some(&ctx.user_token),
        Some(json!({ "user_id": ctx.admin.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    // Second add is a conflict
    let (status, _) = send(
        &ctx.app,
        "POST",
        &format!("/v1/teams/{}/members", team.id),
        Some(&ctx.user_token),
        Some(json!({ "user_id": ctx.admin.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_admin_requires_admin_role() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = send(&ctx.app, "GET", "/v1/admin", Some(&ctx.user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&ctx.app, "GET", "/v1/admin", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&ctx.app, "GET", "/v1/admin", Some(&ctx.admin_token), None).await;
    assert_eq!(status, StatusCode::OK);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_admin_listing_hides_secrets() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(
        &ctx.app,
        "GET",
        "/v1/admin/user",
        Some(&ctx.admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let names: Vec<&str> = body["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"email"));
    assert!(!names.contains(&"password_hash"));
    assert!(!names.contains(&"login_token"));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_admin_team_listing_renders_relationships() {
    let ctx = TestContext::new().await.unwrap();
    let team = account::create_team(&ctx.db, &format!("Rel {}", unique_suffix()), ctx.user.id)
        .await
        .unwrap();

    let (status, body) = send(
        &ctx.app,
        "GET",
        "/v1/admin/team",
        Some(&ctx.admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let columns = body["columns"].as_array().unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c["name"].as_str().unwrap()).collect();
    // Relationship columns replace their foreign keys
    assert!(names.contains(&"creator"));
    assert!(!names.contains(&"creator_id"));

    // The row shows the related user's name, not an ID
    let creator_idx = names.iter().position(|n| *n == "creator").unwrap();
    let name_idx = names.iter().position(|n| *n == "name").unwrap();
    let row = body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r[name_idx] == json!(team.name))
        .expect("created team should be listed");
    assert_eq!(row[creator_idx], json!("Test User"));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_admin_sort_validation() {
    let ctx = TestContext::new().await.unwrap();

    // Sortable column is accepted
    let (status, _) = send(
        &ctx.app,
        "GET",
        "/v1/admin/user?sort=email",
        Some(&ctx.admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Relationship columns are not sortable
    let (status, _) = send(
        &ctx.app,
        "GET",
        "/v1/admin/team?sort=creator",
        Some(&ctx.admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Neither are unknown columns
    let (status, _) = send(
        &ctx.app,
        "GET",
        "/v1/admin/user?sort=no_such_column",
        Some(&ctx.admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_admin_unknown_entity_and_row() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = send(
        &ctx.app,
        "GET",
        "/v1/admin/no_such_entity",
        Some(&ctx.admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &ctx.app,
        "GET",
        "/v1/admin/user/999999999",
        Some(&ctx.admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_admin_update_row() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(
        &ctx.app,
        "POST",
        &format!("/v1/admin/user/{}", ctx.user.id),
        Some(&ctx.admin_token),
        Some(json!({ "name": "Renamed User", "status": "0" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let user = User::find_by_id(&ctx.db, ctx.user.id).await.unwrap().unwrap();
    assert_eq!(user.name.as_deref(), Some("Renamed User"));
    assert_eq!(user.status, UserStatus::Blocked);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_admin_update_rejects_bad_input() {
    let ctx = TestContext::new().await.unwrap();
    let uri = format!("/v1/admin/user/{}", ctx.user.id);

    // Value that does not parse as the column type
    let (status, _) = send(
        &ctx.app,
        "POST",
        &uri,
        Some(&ctx.admin_token),
        Some(json!({ "status": "not-a-number" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Primary keys are not editable
    let (status, _) = send(
        &ctx.app,
        "POST",
        &uri,
        Some(&ctx.admin_token),
        Some(json!({ "id": "42" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown columns are refused, including excluded ones
    let (status, _) = send(
        &ctx.app,
        "POST",
        &uri,
        Some(&ctx.admin_token),
        Some(json!({ "password_hash": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was written
    let user = User::find_by_id(&ctx.db, ctx.user.id).await.unwrap().unwrap();
    assert_eq!(user.status, UserStatus::Active);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_health_endpoint_is_public() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(&ctx.app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    ctx.cleanup().await.unwrap();
}
