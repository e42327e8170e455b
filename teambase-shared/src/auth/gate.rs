/// Session authentication gate
///
/// Resolves the opaque `Authorization: Bearer <token>` credential to a
/// user row and guards protected routes. The gate is composed at route
/// registration time (`axum::middleware::from_fn(login_required(...))`),
/// not discovered per-handler, so the set of protected routes is visible
/// in one place.
///
/// Resolution rules:
///
/// - no header, malformed header, or unknown token: anonymous
/// - token matches a blocked account: anonymous, and the stale token is
///   cleared so it cannot be replayed after a later unblock
/// - token matches an active account: authenticated, the user is attached
///   to the request as a [`CurrentUser`] extension
///
/// CORS preflight (`OPTIONS`) requests and deployments with
/// authentication disabled pass through without a user.

use axum::{
    extract::Request,
    http::{header, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::future::Future;
use std::pin::Pin;

use crate::models::user::{User, UserStatus};

/// Error type for the authentication gate
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// No valid session for a protected route
    #[error("Authentication required")]
    Unauthorized,

    /// Database error during token resolution
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            GateError::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required"),
            GateError::Database(ref e) => {
                tracing::error!("Token resolution failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// The authenticated user for the current request.
///
/// Inserted into request extensions by the gate middleware; handlers
/// receive it via `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extracts the bearer token from the Authorization header.
///
/// Returns `None` when the header is missing, not valid UTF-8, uses a
/// different scheme, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Resolves a login token to its user.
///
/// Returns `Ok(None)` for an unknown token and for a token bound to a
/// blocked account; the blocked account's token is cleared as a side
/// effect. Status, not token presence, decides authentication.
///
/// # Errors
///
/// Returns `sqlx::Error` on database failure.
pub async fn resolve_current_user(
    pool: &PgPool,
    token: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = match User::find_by_login_token(pool, token).await? {
        Some(user) => user,
        None => return Ok(None),
    };

    if user.status != UserStatus::Active {
        tracing::info!(user_id = user.id, "Clearing login token of blocked account");
        User::clear_login_token(pool, user.id).await?;
        return Ok(None);
    }

    Ok(Some(user))
}

/// Gate middleware body.
///
/// Attaches [`CurrentUser`] and forwards when the request carries a valid
/// active session; rejects with 401 otherwise. `OPTIONS` requests and
/// disabled authentication bypass the check entirely (no user attached).
pub async fn session_auth_middleware(
    pool: PgPool,
    login_disabled: bool,
    mut request: Request,
    next: Next,
) -> Result<Response, GateError> {
    if login_disabled || request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let token = match bearer_token(request.headers()) {
        Some(token) => token.to_string(),
        None => return Err(GateError::Unauthorized),
    };

    match resolve_current_user(&pool, &token).await? {
        Some(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            Ok(next.run(request).await)
        }
        None => Err(GateError::Unauthorized),
    }
}

/// Builds the gate closure for `axum::middleware::from_fn`.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use teambase_shared::auth::gate::login_required;
/// # async fn handler() -> &'static str { "ok" }
/// # fn example(pool: sqlx::PgPool) {
/// let protected: Router = Router::new()
///     .route("/v1/session", get(handler))
///     .layer(middleware::from_fn(login_required(pool, false)));
/// # }
/// ```
pub fn login_required(
    pool: PgPool,
    login_disabled: bool,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, GateError>> + Send>>
       + Clone {
    move |request, next| {
        let pool = pool.clone();
        Box::pin(session_auth_middleware(pool, login_disabled, request, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_valid() {
        let headers = headers_with("Bearer abc123");
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let headers = headers_with("Basic dXNlcjpwdw==");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_empty_token() {
        let headers = headers_with("Bearer ");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_trims_whitespace() {
        let headers = headers_with("Bearer   abc123  ");
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_unauthorized_response_status() {
        let response = GateError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Token resolution against blocked accounts is covered by the API
    // integration tests, which need a live database.
}
