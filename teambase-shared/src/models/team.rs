/// Team model and database operations
///
/// A team is a collection of users sharing the same resources. Most
/// resources in the application should belong to a team. Creator and owner
/// both reference existing users; the database refuses to hard-delete a
/// referenced user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     creator_id BIGINT NOT NULL REFERENCES users(id),
///     owner_id BIGINT NOT NULL REFERENCES users(id),
///     created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::schema::{BackingColumn, EntityDef, FieldDef, FieldKind};

/// Team model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Unique team ID
    pub id: i64,

    /// Team name
    pub name: String,

    /// User who created the team
    pub creator_id: i64,

    /// User who owns the team
    pub owner_id: i64,

    /// When the team was created
    pub created: DateTime<Utc>,

    /// Soft delete flag
    pub deleted: bool,
}

/// Input for creating a new team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    /// Team name
    pub name: String,

    /// Creating user
    pub creator_id: i64,

    /// Owning user
    pub owner_id: i64,
}

const TEAM_COLUMNS: &str = "id, name, creator_id, owner_id, created, deleted";

impl Team {
    /// Declarative schema definition consumed by the admin layer.
    ///
    /// `creator`/`owner` are relationships rendered through the related
    /// user's display name; the backing `creator_id`/`owner_id` columns
    /// are declared as foreign keys and suppressed from admin output.
    pub fn entity_def() -> EntityDef {
        let own = |sql_type, pk, fk| BackingColumn {
            table: "teams",
            sql_type,
            primary_key: pk,
            foreign_key: fk,
        };
        EntityDef {
            name: "team",
            table: "teams",
            fields: vec![
                FieldDef { name: "id", kind: FieldKind::Column(own("bigint", true, false)) },
                FieldDef { name: "name", kind: FieldKind::Column(own("varchar", false, false)) },
                FieldDef {
                    name: "creator",
                    kind: FieldKind::Relationship {
                        target_table: "users",
                        target_pk: "id",
                        fk_column: "creator_id",
                        label_column: "name",
                    },
                },
                FieldDef {
                    name: "owner",
                    kind: FieldKind::Relationship {
                        target_table: "users",
                        target_pk: "id",
                        fk_column: "owner_id",
                        label_column: "name",
                    },
                },
                FieldDef {
                    name: "creator_id",
                    kind: FieldKind::Column(own("bigint", false, true)),
                },
                FieldDef { name: "owner_id", kind: FieldKind::Column(own("bigint", false, true)) },
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

    /// Inserts a team row on the given executor.
    pub async fn create<'e, E>(executor: E, data: CreateTeam) -> Result<Self, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, creator_id, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, creator_id, owner_id, created, deleted
            "#,
        )
        .bind(data.name)
        .bind(data.creator_id)
        .bind(data.owner_id)
        .fetch_one(executor)
        .await?;

        Ok(team)
    }

    /// Finds a non-deleted team by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1 AND deleted = FALSE"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Finds a non-deleted team by name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE name = $1 AND deleted = FALSE"
        ))
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Deletes a team (soft by default, physical with `force`).
    pub async fn delete(pool: &PgPool, id: i64, force: bool) -> Result<bool, sqlx::Error> {
        let result = if force {
            sqlx::query("DELETE FROM teams WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?
        } else {
            sqlx::query("UPDATE teams SET deleted = TRUE WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?
        };

        Ok(result.rows_affected() > 0)
    }

    /// Lists non-deleted teams with pagination, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let teams = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE deleted = FALSE \
             ORDER BY created DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(teams)
    }
}
