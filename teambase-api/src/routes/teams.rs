/// Team endpoints
///
/// # Endpoints
///
/// - `POST /v1/teams` - Create a team (creator becomes owner and first member)
/// - `POST /v1/teams/:id/members` - Add a user to a team

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{map_validation, require_user},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use teambase_shared::{
    account,
    auth::CurrentUser,
    models::{team::Team, team_member::TeamMember, user::ROLE_MEMBER},
};
use validator::Validate;

/// Create team request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: i64,

    /// Role within the team (default "member")
    pub role: Option<String>,
}

/// Team response
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    /// Team ID
    pub id: i64,

    /// Team name
    pub name: String,

    /// Creating user
    pub creator_id: i64,

    /// Owning user
    pub owner_id: i64,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            creator_id: team.creator_id,
            owner_id: team.owner_id,
        }
    }
}

/// Membership response
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    /// Membership ID
    pub id: i64,

    /// Team ID
    pub team_id: i64,

    /// User ID
    pub user_id: Option<i64>,

    /// Role within the team
    pub role: String,
}

impl From<&TeamMember> for MemberResponse {
    fn from(member: &TeamMember) -> Self {
        Self {
            id: member.id,
            team_id: member.team_id,
            user_id: member.user_id,
            role: member.role.clone(),
        }
    }
}

/// Create a team
///
/// The current user becomes creator, owner, and first member, all in one
/// transaction.
///
/// # Errors
///
/// - `401 Unauthorized`: No session
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_team(
    State(state): State<AppState>,
    current: Option<Extension<CurrentUser>>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<Json<TeamResponse>> {
    let user = require_user(current)?;
    req.validate().map_err(map_validation)?;

    let team = account::create_team(&state.db, &req.name, user.id).await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// Add a user to a team
///
/// # Errors
///
/// - `404 Not Found`: Team does not exist
/// - `409 Conflict`: User is already a member, or the user ID references
///   no account
pub async fn add_member(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
    current: Option<Extension<CurrentUser>>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<MemberResponse>> {
    require_user(current)?;

    Team::find_by_id(&state.db, team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let role = req.role.as_deref().unwrap_or(ROLE_MEMBER);
    let member = account::add_member(&state.db, team_id, req.user_id, role)
        .await?
        .ok_or_else(|| ApiError::Conflict("User is already a member".to_string()))?;

    Ok(Json(MemberResponse::from(&member)))
}
