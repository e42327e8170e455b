/// Session endpoints
///
/// This module provides account and session endpoints:
/// - Signup (account provisioning)
/// - Login (issue a login token)
/// - Session introspection
/// - Logout (revoke the login token)
///
/// # Endpoints
///
/// - `POST /v1/signup` - Create an account
/// - `POST /v1/login` - Authenticate and receive a login token
/// - `GET /v1/session` - Current user for the presented token
/// - `POST /v1/logout` - Revoke the presented token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{map_validation, require_user},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use teambase_shared::{
    account::{self, NewAccount},
    auth::{generate_login_token, password, CurrentUser},
    models::user::{User, UserStatus, ROLE_USER},
};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The authenticated user
    pub user: UserSummary,

    /// Opaque login token for `Authorization: Bearer`
    pub login_token: String,
}

/// Public view of a user, without credential columns
#[derive(Debug, Serialize)]
pub struct UserSummary {
    /// User ID
    pub id: i64,

    /// Display name
    pub name: Option<String>,

    /// Email address
    pub email: String,

    /// Role string
    pub role: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

/// Create an account
///
/// # Endpoint
///
/// ```text
/// POST /v1/signup
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "s3cret-pw",
///   "name": "Ann"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already bound to an account
/// - `422 Unprocessable Entity`: Validation failed
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<UserSummary>> {
    req.validate().map_err(map_validation)?;

    let user = account::create_user(
        &state.db,
        NewAccount {
            name: req.name,
            email: req.email,
            password: req.password,
            role: ROLE_USER.to_string(),
            status: UserStatus::Active,
        },
    )
    .await?
    .ok_or_else(|| ApiError::Conflict("Email already exists".to_string()))?;

    Ok(Json(UserSummary::from(&user)))
}

/// Authenticate and receive a login token
///
/// A fresh token is issued on every successful login, replacing any
/// previous one; a blocked account cannot log in.
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email, wrong password, or blocked account
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(map_validation)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if user.status != UserStatus::Active {
        return Err(ApiError::Unauthorized("Account is blocked".to_string()));
    }

    let login_token = generate_login_token();
    User::set_login_token(&state.db, user.id, &login_token).await?;

    Ok(Json(LoginResponse {
        user: UserSummary::from(&user),
        login_token,
    }))
}

/// Current user for the presented token
pub async fn session(
    current: Option<Extension<CurrentUser>>,
) -> ApiResult<Json<UserSummary>> {
    let user = require_user(current)?;
    Ok(Json(UserSummary::from(&user)))
}

/// Revoke the presented token
///
/// Idempotent: logging out twice is not an error, the second call just
/// fails the gate.
pub async fn logout(
    State(state): State<AppState>,
    current: Option<Extension<CurrentUser>>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = require_user(current)?;
    User::clear_login_token(&state.db, user.id).await?;

    Ok(Json(json!({ "ok": true })))
}
