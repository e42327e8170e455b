/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use teambase_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = teambase_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use teambase_shared::admin::AdminRegistry;
use teambase_shared::auth::login_required;
use teambase_shared::models::{team::Team, team_member::TeamMember, user::User};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Entities exposed through the admin screens
    pub admin: Arc<AdminRegistry>,
}

impl AppState {
    /// Creates new application state with the default admin registry
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            admin: Arc::new(build_admin_registry()),
        }
    }
}

/// Builds the admin registry.
///
/// Registration order is presentation order. Secrets and bookkeeping
/// columns are excluded per entity: password hashes and login tokens
/// never render, and the soft delete flag is an implementation detail.
pub fn build_admin_registry() -> AdminRegistry {
    let mut registry = AdminRegistry::new();
    registry.register(
        User::entity_def(),
        vec![],
        vec!["password_hash", "login_token", "deleted"],
    );
    registry.register(Team::entity_def(), vec![], vec!["deleted"]);
    registry.register(TeamMember::entity_def(), vec![], vec!["deleted"]);
    registry
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /v1/                          # API v1 (versioned)
///     ├── POST /signup              # Account creation (public)
///     ├── POST /login               # Session creation (public)
///     ├── GET  /session             # Current user (authenticated)
///     ├── POST /logout              # Session teardown (authenticated)
///     ├── POST /teams               # Create team (authenticated)
///     ├── POST /teams/:id/members   # Add member (authenticated)
///     └── /admin/                   # Admin screens (authenticated + admin role)
///         ├── GET  /                # Entity index
///         ├── GET  /:entity         # Entity listing (?sort=col)
///         ├── GET  /:entity/:key    # Row detail
///         └── POST /:entity/:key    # Row update
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Session gate (protected routes only, composed here)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public session endpoints
    let public_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login));

    // Everything behind the session gate
    let protected_routes = Router::new()
        .route("/session", get(routes::auth::session))
        .route("/logout", post(routes::auth::logout))
        .route("/teams", post(routes::teams::create_team))
        .route("/teams/:id/members", post(routes::teams::add_member))
        .route("/admin", get(routes::admin::index))
        .route("/admin/:entity", get(routes::admin::list))
        .route(
            "/admin/:entity/:key",
            get(routes::admin::detail).post(routes::admin::update),
        )
        .layer(axum::middleware::from_fn(login_required(
            state.db.clone(),
            state.config.auth.login_disabled,
        )));

    let v1_routes = Router::new().merge(public_routes).merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_registry_entities() {
        let registry = build_admin_registry();
        assert_eq!(registry.names(), vec!["user", "team", "team_member"]);
    }

    #[test]
    fn test_admin_registry_hides_secrets() {
        let registry = build_admin_registry();
        let entry = registry.get("user").unwrap();
        let names: Vec<String> = entry.columns().into_iter().map(|c| c.name).collect();
        assert!(!names.contains(&"password_hash".to_string()));
        assert!(!names.contains(&"login_token".to_string()));
    }
}
