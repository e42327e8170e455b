/// User model and database operations
///
/// The User is the root identity entity: email is the login identity,
/// passwords are stored as Argon2id hashes, and an optional opaque
/// `login_token` binds an active session to the account.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255),
///     email VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     status SMALLINT NOT NULL DEFAULT 1,
///     role TEXT NOT NULL DEFAULT 'user',
///     login_token VARCHAR(64),
///     created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```
///
/// Email uniqueness is enforced by a partial unique index over non-deleted
/// rows, so a soft-deleted account frees its address.
///
/// # Example
///
/// ```no_run
/// use teambase_shared::models::user::{CreateUser, User, UserStatus, ROLE_USER};
/// # async fn example(pool: sqlx::PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         name: Some("Ann".to_string()),
///         email: "ann@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         role: ROLE_USER.to_string(),
///         status: UserStatus::Active,
///     },
/// )
/// .await?;
/// println!("created user {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::schema::{BackingColumn, EntityDef, FieldDef, FieldKind};

/// Administrator role
pub const ROLE_ADMIN: &str = "admin";

/// Regular user role
pub const ROLE_USER: &str = "user";

/// Team member role (used on memberships)
pub const ROLE_MEMBER: &str = "member";

/// Account status
///
/// Stored as SMALLINT: blocked accounts keep their row but cannot
/// authenticate; their stale login token is cleared on next use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account is blocked; token resolution treats it as anonymous
    Blocked = 0,

    /// Account is active and may authenticate
    Active = 1,
}

impl UserStatus {
    /// Parses a status from its stored SMALLINT value.
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(UserStatus::Blocked),
            1 => Some(UserStatus::Active),
            _ => None,
        }
    }
}

/// User model representing one account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Optional display name
    pub name: Option<String>,

    /// Email address; unique among non-deleted users, used as login identity
    pub email: String,

    /// Argon2id password hash, never the raw password
    pub password_hash: String,

    /// Account status
    pub status: UserStatus,

    /// Role string ("admin", "user", "member")
    pub role: String,

    /// Opaque session credential; `None` when logged out
    pub login_token: Option<String>,

    /// When the account was created
    pub created: DateTime<Utc>,

    /// Soft delete flag
    pub deleted: bool,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Optional display name
    pub name: Option<String>,

    /// Email address (login identity)
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Role string
    pub role: String,

    /// Initial status
    pub status: UserStatus,
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, status, role, login_token, created, deleted";

impl User {
    /// Declarative schema definition consumed by the admin layer.
    ///
    /// Field order here is the order admin screens render columns in.
    pub fn entity_def() -> EntityDef {
        let own = |sql_type, pk, fk| BackingColumn {
            table: "users",
            sql_type,
            primary_key: pk,
            foreign_key: fk,
        };
        EntityDef {
            name: "user",
            table: "users",
            fields: vec![
                FieldDef { name: "id", kind: FieldKind::Column(own("bigint", true, false)) },
                FieldDef { name: "name", kind: FieldKind::Column(own("varchar", false, false)) },
                FieldDef { name: "email", kind: FieldKind::Column(own("varchar", false, false)) },
                FieldDef {
                    name: "password_hash",
                    kind: FieldKind::Column(own("varchar", false, false)),
                },
                FieldDef { name: "status", kind: FieldKind::Column(own("smallint", false, false)) },
                FieldDef { name: "role", kind: FieldKind::Column(own("text", false, false)) },
                FieldDef {
                    name: "login_token",
                    kind: FieldKind::Column(own("varchar", false, false)),
                },
                FieldDef {
                    name: "created",
                    kind: FieldKind::Column(own("timestamptz", false, false)),
                },
                FieldDef {
                    name: "deleted",
                    kind: FieldKind::Column(own("boolean", false, false)),
                },
            ],
        }
    }

    /// Inserts a user row on the given executor.
    ///
    /// Takes any executor so callers can run the insert inside their own
    /// transaction; account provisioning does exactly that.
    ///
    /// # Errors
    ///
    /// Returns an error on unique-index violation (email already bound to
    /// a non-deleted account) or any other database failure.
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, status, role, login_token, created, deleted
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .bind(data.status)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a non-deleted user by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted = FALSE"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a non-deleted user by email address.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted = FALSE"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a non-deleted user by login token.
    ///
    /// Status is NOT checked here; the authentication gate decides what a
    /// blocked account's token means.
    pub async fn find_by_login_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE login_token = $1 AND deleted = FALSE"
        ))
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Stores a new login token on the user row.
    pub async fn set_login_token(pool: &PgPool, id: i64, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET login_token = $2 WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clears the stored login token (logout, or the stale token of a
    /// blocked account).
    pub async fn clear_login_token(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET login_token = NULL WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates the account status.
    pub async fn update_status(
        pool: &PgPool,
        id: i64,
        status: UserStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces the stored password hash.
    pub async fn update_password_hash(
        pool: &PgPool,
        id: i64,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a user.
    ///
    /// Soft delete by default: the row is kept with `deleted = TRUE` and
    /// drops out of every read path. `force` removes the row physically;
    /// the database refuses if a team still references the user.
    pub async fn delete(pool: &PgPool, id: i64, force: bool) -> Result<bool, sqlx::Error> {
        let result = if force {
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?
        } else {
            sqlx::query("UPDATE users SET deleted = TRUE WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?
        };

        Ok(result.rows_affected() > 0)
    }

    /// Lists non-deleted users with pagination, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE deleted = FALSE \
             ORDER BY created DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
