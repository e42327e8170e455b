/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user creation (admin and regular)
/// - Login token issuance
/// - API client helpers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use teambase_api::app::{build_router, AppState};
use teambase_api::config::Config;
use teambase_shared::account::{self, NewAccount};
use teambase_shared::auth::generate_login_token;
use teambase_shared::models::user::{User, UserStatus, ROLE_USER};
use tower::Service as _;

static UNIQUE: AtomicU64 = AtomicU64::new(0);

/// Returns a value unique across this test process, for email addresses.
pub fn unique_suffix() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = UNIQUE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", nanos, n)
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub admin: User,
    pub admin_token: String,
    pub user: User,
    pub user_token: String,
}

impl TestContext {
    /// Creates a new test context with one admin and one regular user,
    /// both holding a fresh login token.
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration (DATABASE_URL must point at a test database)
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../teambase-shared/migrations").run(&db).await?;

        let admin = account::create_admin_user(
            &db,
            NewAccount {
                name: Some("Test Admin".to_string()),
                email: format!("admin-{}@example.com", unique_suffix()),
                password: "test-password-123".to_string(),
                role: String::new(), // overridden by create_admin_user
                status: UserStatus::Active,
            },
        )
        .await?
        .expect("admin email should be available");

        let user = account::create_user(
            &db,
            NewAccount {
                name: Some("Test User".to_string()),
                email: format!("user-{}@example.com", unique_suffix()),
                password: "test-password-123".to_string(),
                role: ROLE_USER.to_string(),
                status: UserStatus::Active,
            },
        )
        .await?
        .expect("user email should be available");

        let admin_token = generate_login_token();
        User::set_login_token(&db, admin.id, &admin_token).await?;

        let user_token = generate_login_token();
        User::set_login_token(&db, user.id, &user_token).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            admin,
            admin_token,
            user,
            user_token,
        })
    }

    /// Returns an authorization header value for the given token
    pub fn auth_header(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Cleans up test data created through this context
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        let ids = [self.admin.id, self.user.id];

        // Memberships and teams first; users are referenced with RESTRICT
        sqlx::query("DELETE FROM team_members WHERE user_id = ANY($1)")
            .bind(&ids[..])
            .execute(&self.db)
            .await?;
        sqlx::query(
            "DELETE FROM team_members WHERE team_id IN \
             (SELECT id FROM teams WHERE creator_id = ANY($1))",
        )
        .bind(&ids[..])
        .execute(&self.db)
        .await?;
        sqlx::query("DELETE FROM teams WHERE creator_id = ANY($1)")
            .bind(&ids[..])
            .execute(&self.db)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(&ids[..])
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

/// Sends one request through the router and decodes the JSON body.
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", TestContext::auth_header(token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
