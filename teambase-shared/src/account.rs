/// Account provisioning
///
/// Creation flows that span validation, password hashing, and one or more
/// inserts. Every multi-step flow runs inside a single transaction; an
/// error after the first insert rolls the whole flow back, so no partial
/// record survives a failure.
///
/// Availability-style refusals (email taken, duplicate membership) are
/// `Ok(None)`, not errors: the caller asked a question and got the answer
/// "no". Errors are reserved for failures of the machinery itself.
///
/// # Example
///
/// ```no_run
/// use teambase_shared::account::{create_user, NewAccount};
/// use teambase_shared::models::user::{UserStatus, ROLE_USER};
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let account = NewAccount {
///     name: Some("Ann".to_string()),
///     email: "ann@example.com".to_string(),
///     password: "s3cret".to_string(),
///     role: ROLE_USER.to_string(),
///     status: UserStatus::Active,
/// };
/// match create_user(&pool, account).await? {
///     Some(user) => println!("created user {}", user.id),
///     None => println!("email unavailable"),
/// }
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;

use crate::auth::password::{hash_password, PasswordError};
use crate::models::team::{CreateTeam, Team};
use crate::models::team_member::{CreateTeamMember, TeamMember};
use crate::models::user::{CreateUser, User, UserStatus, ROLE_ADMIN, ROLE_MEMBER};

/// Error type for provisioning operations
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failed
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

/// Input for provisioning a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Optional display name
    pub name: Option<String>,

    /// Email address (login identity)
    pub email: String,

    /// Raw password; hashed before anything touches the database
    pub password: String,

    /// Role string ("admin", "user", "member")
    pub role: String,

    /// Initial status; a blocked account can be provisioned ahead of
    /// activation
    pub status: UserStatus,
}

/// Checks whether an email can be used for a new account.
///
/// Empty addresses are never available. A soft-deleted account does not
/// hold its address.
pub async fn email_is_available(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    if email.is_empty() {
        return Ok(false);
    }
    Ok(User::find_by_email(pool, email).await?.is_none())
}

/// Provisions a user account with the requested role and status.
///
/// Returns `Ok(None)` when the email is empty or already bound to a
/// non-deleted account. The availability check and the insert are not one
/// atomic step; the partial unique index on `users.email` closes the race,
/// surfacing a concurrent duplicate as a database error.
///
/// # Errors
///
/// Returns `AccountError::Password` if hashing fails,
/// `AccountError::Database` on any database failure.
pub async fn create_user(pool: &PgPool, account: NewAccount) -> Result<Option<User>, AccountError> {
    if !email_is_available(pool, &account.email).await? {
        tracing::info!(email = %account.email, "Refusing account creation, email unavailable");
        return Ok(None);
    }

    let password_hash = hash_password(&account.password)?;

    let mut tx = pool.begin().await?;

    let user = User::create(
        &mut *tx,
        CreateUser {
            name: account.name,
            email: account.email,
            password_hash,
            role: account.role,
            status: account.status,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = user.id, role = %user.role, "Created account");
    Ok(Some(user))
}

/// Provisions an administrator account.
///
/// [`create_user`] pinned to the `admin` role and active status; the
/// admin role grants access to the admin screens.
pub async fn create_admin_user(
    pool: &PgPool,
    account: NewAccount,
) -> Result<Option<User>, AccountError> {
    create_user(
        pool,
        NewAccount {
            role: ROLE_ADMIN.to_string(),
            status: UserStatus::Active,
            ..account
        },
    )
    .await
}

/// Creates a team and its first membership in one transaction.
///
/// The creating user becomes both creator and owner, and joins the team
/// as an active member. If the membership insert fails (for instance a
/// foreign key violation on a bad user ID) the team insert rolls back
/// with it.
///
/// # Errors
///
/// Returns `sqlx::Error` on any database failure, including a
/// `creator_id` that references no user.
pub async fn create_team(pool: &PgPool, name: &str, creator_id: i64) -> Result<Team, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let team = Team::create(
        &mut *tx,
        CreateTeam {
            name: name.to_string(),
            creator_id,
            owner_id: creator_id,
        },
    )
    .await?;

    TeamMember::create(
        &mut *tx,
        CreateTeamMember {
            team_id: team.id,
            user_id: Some(creator_id),
            status: UserStatus::Active,
            role: ROLE_MEMBER.to_string(),
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(team_id = team.id, creator_id, "Created team");
    Ok(team)
}

/// Adds a user to a team.
///
/// Returns `Ok(None)` when a non-deleted membership already pairs the
/// user with the team, whatever its status; a blocked membership is
/// unblocked by updating it, not by adding a second row.
pub async fn add_member(
    pool: &PgPool,
    team_id: i64,
    user_id: i64,
    role: &str,
) -> Result<Option<TeamMember>, sqlx::Error> {
    if TeamMember::find(pool, team_id, user_id).await?.is_some() {
        return Ok(None);
    }

    let member = TeamMember::create(
        pool,
        CreateTeamMember {
            team_id,
            user_id: Some(user_id),
            status: UserStatus::Active,
            role: role.to_string(),
        },
    )
    .await?;

    tracing::info!(team_id, user_id, "Added team member");
    Ok(Some(member))
}
