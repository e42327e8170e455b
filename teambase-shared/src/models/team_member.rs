/// Team membership model and database operations
///
/// Join entity linking a user to a team with its own status and role.
/// Membership status (active/blocked) controls participation in the team
/// independently of the user's own account status.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE team_members (
///     id BIGSERIAL PRIMARY KEY,
///     team_id BIGINT NOT NULL REFERENCES teams(id),
///     user_id BIGINT REFERENCES users(id),
///     status SMALLINT NOT NULL DEFAULT 1,
///     role TEXT NOT NULL DEFAULT 'member',
///     created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::user::UserStatus;
use crate::schema::{BackingColumn, EntityDef, FieldDef, FieldKind};

/// Team membership model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    /// Unique membership ID
    pub id: i64,

    /// Team the membership belongs to
    pub team_id: i64,

    /// Member user; nullable for invitations not yet bound to an account
    pub user_id: Option<i64>,

    /// Membership status, independent of the user's account status
    pub status: UserStatus,

    /// Role within the team (default "member")
    pub role: String,

    /// When the membership was created
    pub created: DateTime<Utc>,

    /// Soft delete flag
    pub deleted: bool,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamMember {
    /// Team ID
    pub team_id: i64,

    /// User ID
    pub user_id: Option<i64>,

    /// Membership status
    pub status: UserStatus,

    /// Role within the team
    pub role: String,
}

const MEMBER_COLUMNS: &str = "id, team_id, user_id, status, role, created, deleted";

impl TeamMember {
    /// Declarative schema definition consumed by the admin layer.
    pub fn entity_def() -> EntityDef {
        let own = |sql_type, pk, fk| BackingColumn {
            table: "team_members",
            sql_type,
            primary_key: pk,
            foreign_key: fk,
        };
        EntityDef {
            name: "team_member",
            table: "team_members",
            fields: vec![
                FieldDef { name: "id", kind: FieldKind::Column(own("bigint", true, false)) },
                FieldDef {
                    name: "team",
                    kind: FieldKind::Relationship {
                        target_table: "teams",
                        target_pk: "id",
                        fk_column: "team_id",
                        label_column: "name",
                    },
                },
                FieldDef {
                    name: "user",
                    kind: FieldKind::Relationship {
                        target_table: "users",
                        target_pk: "id",
                        fk_column: "user_id",
                        label_column: "name",
                    },
                },
                FieldDef { name: "team_id", kind: FieldKind::Column(own("bigint", false, true)) },
                FieldDef { name: "user_id", kind: FieldKind::Column(own("bigint", false, true)) },
                FieldDef { name: "status", kind: FieldKind::Column(own("smallint", false, false)) },
                FieldDef { name: "role", kind: FieldKind::Column(own("text", false, false)) },
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

    /// Inserts a membership row on the given executor.
    pub async fn create<'e, E>(executor: E, data: CreateTeamMember) -> Result<Self, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let member = sqlx::query_as::<_, TeamMember>(
            r#"
            INSERT INTO team_members (team_id, user_id, status, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, team_id, user_id, status, role, created, deleted
            "#,
        )
        .bind(data.team_id)
        .bind(data.user_id)
        .bind(data.status)
        .bind(data.role)
        .fetch_one(executor)
        .await?;

        Ok(member)
    }

    /// Finds the non-deleted membership pairing a team with a user.
    pub async fn find(
        pool: &PgPool,
        team_id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, TeamMember>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members \
             WHERE team_id = $1 AND user_id = $2 AND deleted = FALSE"
        ))
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Lists a team's non-deleted memberships.
    pub async fn list_by_team(pool: &PgPool, team_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let members = sqlx::query_as::<_, TeamMember>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members \
             WHERE team_id = $1 AND deleted = FALSE ORDER BY created"
        ))
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Lists a user's non-deleted memberships.
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let members = sqlx::query_as::<_, TeamMember>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members \
             WHERE user_id = $1 AND deleted = FALSE ORDER BY created"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Updates the membership status (block/unblock within the team).
    pub async fn update_status(
        pool: &PgPool,
        id: i64,
        status: UserStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE team_members SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a membership (soft by default, physical with `force`).
    pub async fn delete(pool: &PgPool, id: i64, force: bool) -> Result<bool, sqlx::Error> {
        let result = if force {
            sqlx::query("DELETE FROM team_members WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?
        } else {
            sqlx::query("UPDATE team_members SET deleted = TRUE WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?
        };

        Ok(result.rows_affected() > 0)
    }
}
