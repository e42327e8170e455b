/// Generic admin screens
///
/// One set of handlers serves every registered entity; nothing here
/// names a concrete table. All endpoints require an authenticated admin.
///
/// # Endpoints
///
/// - `GET /v1/admin` - Registered entities and their columns
/// - `GET /v1/admin/:entity?sort=col` - Entity listing
/// - `GET /v1/admin/:entity/:key` - Row detail (composite keys comma-separated)
/// - `POST /v1/admin/:entity/:key` - Row update

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::require_admin,
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use teambase_shared::{
    admin::{self, AdminRow, ListView, PkValue},
    auth::CurrentUser,
    schema::ColumnDescriptor,
};

/// Query parameters for listings
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Column to sort by; must be sortable
    pub sort: Option<String>,
}

/// One entity on the admin index
#[derive(Debug, Serialize)]
pub struct EntityIndexEntry {
    /// Entity name, as used in admin URLs
    pub entity: String,

    /// Columns its screens render
    pub columns: Vec<ColumnDescriptor>,
}

/// Row detail response
#[derive(Debug, Serialize)]
pub struct DetailResponse {
    /// Entity name
    pub entity: String,

    /// Column descriptors, positionally matching `row`
    pub columns: Vec<ColumnDescriptor>,

    /// The row, values cast to text
    pub row: AdminRow,
}

/// Registered entities and their columns
pub async fn index(
    State(state): State<AppState>,
    current: Option<Extension<CurrentUser>>,
) -> ApiResult<Json<Vec<EntityIndexEntry>>> {
    require_admin(current)?;

    let entries = state
        .admin
        .names()
        .into_iter()
        .filter_map(|name| state.admin.get(name))
        .map(|entry| EntityIndexEntry {
            entity: entry.def.name.to_string(),
            columns: entry.columns(),
        })
        .collect();

    Ok(Json(entries))
}

/// Entity listing
///
/// # Errors
///
/// - `400 Bad Request`: Sort column is unknown or not sortable
/// - `404 Not Found`: Entity is not registered
pub async fn list(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(params): Query<ListParams>,
    current: Option<Extension<CurrentUser>>,
) -> ApiResult<Json<ListView>> {
    require_admin(current)?;

    let entry = state
        .admin
        .get(&entity)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown entity '{}'", entity)))?;

    let view = admin::fetch_list(&state.db, entry, params.sort.as_deref()).await?;

    Ok(Json(view))
}

/// Row detail
///
/// # Errors
///
/// - `404 Not Found`: Entity not registered, or no row matches the key
pub async fn detail(
    State(state): State<AppState>,
    Path((entity, key)): Path<(String, String)>,
    current: Option<Extension<CurrentUser>>,
) -> ApiResult<Json<DetailResponse>> {
    require_admin(current)?;

    let entry = state
        .admin
        .get(&entity)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown entity '{}'", entity)))?;

    let pk = PkValue::parse(&key);
    let row = admin::fetch_row(&state.db, entry, &pk)
        .await?
        .ok_or_else(|| ApiError::NotFound("Row not found".to_string()))?;

    Ok(Json(DetailResponse {
        entity: entry.def.name.to_string(),
        columns: entry.columns(),
        row,
    }))
}

/// Row update
///
/// The body is a flat map of column name to string value; each value is
/// validated against its column's type before anything is written.
/// Returns the row as stored after the update.
///
/// # Errors
///
/// - `400 Bad Request`: Unknown or non-editable column
/// - `404 Not Found`: Entity not registered, or no row matches the key
/// - `422 Unprocessable Entity`: A value fails type validation
pub async fn update(
    State(state): State<AppState>,
    Path((entity, key)): Path<(String, String)>,
    current: Option<Extension<CurrentUser>>,
    Json(values): Json<HashMap<String, String>>,
) -> ApiResult<Json<DetailResponse>> {
    require_admin(current)?;

    let entry = state
        .admin
        .get(&entity)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown entity '{}'", entity)))?;

    let pk = PkValue::parse(&key);
    let updated = admin::update_row(&state.db, entry, &pk, &values).await?;
    if !updated {
        return Err(ApiError::NotFound("Row not found".to_string()));
    }

    let row = admin::fetch_row(&state.db, entry, &pk)
        .await?
        .ok_or_else(|| ApiError::NotFound("Row not found".to_string()))?;

    Ok(Json(DetailResponse {
        entity: entry.def.name.to_string(),
        columns: entry.columns(),
        row,
    }))
}
