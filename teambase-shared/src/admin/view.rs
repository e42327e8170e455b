/// Generic admin list and detail views
///
/// Builds list, detail, and update queries for any registered entity from
/// its schema definition alone. Every selected value is cast to `::text`
/// so one row shape (`Vec<Option<String>>`) serves all entities;
/// relationship columns render the related row's label through a LEFT
/// JOIN instead of the raw foreign key.
///
/// All identifiers interpolated into SQL come from static schema
/// definitions, never from the request; request-supplied sort columns are
/// checked against the sortable descriptors first, and request-supplied
/// values are always bound as parameters.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::{PgPool, Row};

use super::registry::AdminEntry;
use super::validate::validate_value;
use crate::schema::{ColumnDescriptor, FieldKind};

/// Error type for admin view operations
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Sort parameter does not name a sortable column
    #[error("Cannot sort by '{0}'")]
    InvalidSort(String),

    /// Key segment count does not match the entity's primary key
    #[error("Malformed row key")]
    InvalidKey,

    /// Submitted column does not exist on the entity's admin view
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// Submitted column exists but cannot be edited
    #[error("Column '{0}' is not editable")]
    NotEditable(String),

    /// Submitted value does not parse as the column's type
    #[error("Invalid value for '{column}': {message}")]
    InvalidValue {
        /// Column the value was submitted for
        column: String,
        /// What the value failed to parse as
        message: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A row key from the URL path.
///
/// Composite keys are comma-separated path segments matched positionally
/// against the entity's primary key columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PkValue {
    /// Single-column key
    Single(String),

    /// Composite key, one segment per primary key column
    Tuple(Vec<String>),
}

impl PkValue {
    /// Parses a path segment into a key.
    pub fn parse(raw: &str) -> Self {
        if raw.contains(',') {
            PkValue::Tuple(raw.split(',').map(str::to_string).collect())
        } else {
            PkValue::Single(raw.to_string())
        }
    }

    /// Key segments in declaration order.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            PkValue::Single(v) => vec![v.as_str()],
            PkValue::Tuple(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

/// One rendered row: values in column order, cast to text.
#[derive(Debug, Clone, Serialize)]
pub struct AdminRow(pub Vec<Option<String>>);

/// A rendered entity listing.
#[derive(Debug, Serialize)]
pub struct ListView {
    /// Entity name
    pub entity: String,

    /// Column descriptors, in presentation order
    pub columns: Vec<ColumnDescriptor>,

    /// Rows, values positionally matching `columns`
    pub rows: Vec<AdminRow>,
}

/// Builds the SELECT list and JOIN clauses for an entity's columns.
///
/// The base table is aliased `t`; each relationship gets its own join
/// alias so an entity can reference the same target table twice.
fn select_clause(entry: &AdminEntry, columns: &[ColumnDescriptor]) -> (String, String) {
    let mut selects = Vec::with_capacity(columns.len());
    let mut joins = String::new();
    let mut join_idx = 0;

    for descriptor in columns {
        match entry.def.field(&descriptor.name).map(|f| &f.kind) {
            Some(FieldKind::Relationship { target_table, target_pk, fk_column, label_column }) => {
                let alias = format!("r{}", join_idx);
                join_idx += 1;
                selects.push(format!("{}.{}::text", alias, label_column));
                joins.push_str(&format!(
                    " LEFT JOIN {} {} ON {}.{} = t.{}",
                    target_table, alias, alias, target_pk, fk_column
                ));
            }
            _ => selects.push(format!("t.{}::text", descriptor.name)),
        }
    }

    (selects.join(", "), joins)
}

fn row_values(row: &sqlx::postgres::PgRow, width: usize) -> Result<AdminRow, sqlx::Error> {
    (0..width)
        .map(|i| row.try_get::<Option<String>, _>(i))
        .collect::<Result<Vec<_>, _>>()
        .map(AdminRow)
}

fn key_conditions(pk_columns: &[&str], first_param: usize) -> String {
    pk_columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("t.{}::text = ${}", col, first_param + i))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Lists an entity's non-deleted rows.
///
/// `sort` must name a sortable column of the entity's admin view; without
/// it, rows come back in primary key order.
///
/// # Errors
///
/// Returns `AdminError::InvalidSort` when `sort` names a missing,
/// relationship, or primary key column.
pub async fn fetch_list(
    pool: &PgPool,
    entry: &AdminEntry,
    sort: Option<&str>,
) -> Result<ListView, AdminError> {
    let columns = entry.columns();

    let order_by = match sort {
        Some(name) => {
            if !columns.iter().any(|c| c.is_sortable && c.name == name) {
                return Err(AdminError::InvalidSort(name.to_string()));
            }
            format!("t.{}", name)
        }
        None => entry
            .def
            .primary_key_columns()
            .iter()
            .map(|c| format!("t.{}", c))
            .collect::<Vec<_>>()
            .join(", "),
    };

    let (selects, joins) = select_clause(entry, &columns);
    let sql = format!(
        "SELECT {} FROM {} t{} WHERE t.deleted = FALSE ORDER BY {}",
        selects, entry.def.table, joins, order_by
    );
    tracing::debug!(entity = entry.def.name, %sql, "Admin list query");

    let rows = sqlx::query(&sql)
        .fetch_all(pool)
        .await?
        .iter()
        .map(|row| row_values(row, columns.len()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ListView { entity: entry.def.name.to_string(), columns, rows })
}

/// Fetches one row by primary key.
///
/// Returns `Ok(None)` when no non-deleted row matches the key.
///
/// # Errors
///
/// Returns `AdminError::InvalidKey` when the key's segment count does not
/// match the entity's primary key columns.
pub async fn fetch_row(
    pool: &PgPool,
    entry: &AdminEntry,
    pk: &PkValue,
) -> Result<Option<AdminRow>, AdminError> {
    let pk_columns = entry.def.primary_key_columns();
    let segments = pk.segments();
    if segments.len() != pk_columns.len() {
        return Err(AdminError::InvalidKey);
    }

    let columns = entry.columns();
    let (selects, joins) = select_clause(entry, &columns);
    let sql = format!(
        "SELECT {} FROM {} t{} WHERE t.deleted = FALSE AND {}",
        selects,
        entry.def.table,
        joins,
        key_conditions(&pk_columns, 1)
    );

    let mut query = sqlx::query(&sql);
    for segment in &segments {
        query = query.bind(segment.to_string());
    }

    match query.fetch_optional(pool).await? {
        Some(row) => Ok(Some(row_values(&row, columns.len())?)),
        None => Ok(None),
    }
}

/// Applies submitted values to one row.
///
/// Every value is validated against its column's SQL type before the
/// UPDATE runs, and the UPDATE executes in a single transaction with each
/// parameter cast server-side (`$n::type`). Returns whether a row
/// matched the key.
///
/// # Errors
///
/// Returns `AdminError::UnknownColumn` for a value naming no admin
/// column, `AdminError::NotEditable` for primary key or relationship
/// columns, `AdminError::InvalidValue` when a value fails to parse.
pub async fn update_row(
    pool: &PgPool,
    entry: &AdminEntry,
    pk: &PkValue,
    values: &HashMap<String, String>,
) -> Result<bool, AdminError> {
    let pk_columns = entry.def.primary_key_columns();
    let segments = pk.segments();
    if segments.len() != pk_columns.len() {
        return Err(AdminError::InvalidKey);
    }
    if values.is_empty() {
        return fetch_row(pool, entry, pk).await.map(|row| row.is_some());
    }

    let columns = entry.columns();
    for name in values.keys() {
        let descriptor = columns
            .iter()
            .find(|c| c.name == *name)
            .ok_or_else(|| AdminError::UnknownColumn(name.clone()))?;
        if descriptor.is_primary_key || descriptor.is_relationship || descriptor.sql_type.is_none()
        {
            return Err(AdminError::NotEditable(name.clone()));
        }
    }

    // Iterate descriptors, not the map, so the generated SQL is stable.
    let mut assignments = Vec::new();
    let mut binds = Vec::new();
    for descriptor in &columns {
        let Some(raw) = values.get(&descriptor.name) else {
            continue;
        };
        let sql_type = descriptor.sql_type.as_deref().unwrap_or("text");
        validate_value(sql_type, raw).map_err(|message| AdminError::InvalidValue {
            column: descriptor.name.clone(),
            message,
        })?;
        assignments.push(format!(
            "{} = ${}::{}",
            descriptor.name,
            assignments.len() + 1,
            sql_type
        ));
        binds.push(raw.clone());
    }

    let sql = format!(
        "UPDATE {} AS t SET {} WHERE t.deleted = FALSE AND {}",
        entry.def.table,
        assignments.join(", "),
        key_conditions(&pk_columns, binds.len() + 1)
    );
    tracing::debug!(entity = entry.def.name, %sql, "Admin update query");

    let mut tx = pool.begin().await?;

    let mut query = sqlx::query(&sql);
    for value in binds {
        query = query.bind(value);
    }
    for segment in &segments {
        query = query.bind(segment.to_string());
    }
    let result = query.execute(&mut *tx).await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}
