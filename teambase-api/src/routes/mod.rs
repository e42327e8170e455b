/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Session endpoints (signup, login, session, logout)
/// - `teams`: Team creation and membership
/// - `admin`: Generic admin screens

pub mod admin;
pub mod auth;
pub mod health;
pub mod teams;

use axum::Extension;
use teambase_shared::auth::CurrentUser;
use teambase_shared::models::user::{User, ROLE_ADMIN};

use crate::error::{ApiError, ValidationErrorDetail};

/// Unwraps the gate's user extension.
///
/// The extension is absent when authentication is disabled; endpoints
/// that act on behalf of a user still need one then.
pub(crate) fn require_user(current: Option<Extension<CurrentUser>>) -> Result<User, ApiError> {
    current
        .map(|Extension(CurrentUser(user))| user)
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
}

/// Requires the admin role.
///
/// With authentication disabled there is no user to check and the admin
/// screens are open; that mode is for local development only.
pub(crate) fn require_admin(current: Option<Extension<CurrentUser>>) -> Result<(), ApiError> {
    match current {
        Some(Extension(CurrentUser(user))) if user.role != ROLE_ADMIN => Err(ApiError::Forbidden(
            "Admin role required".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Maps `validator` errors onto the API's 422 response shape.
pub(crate) fn map_validation(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}
