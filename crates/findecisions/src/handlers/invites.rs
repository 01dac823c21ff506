//! Invite route handlers.
//!
//! Invites are short-lived: they expire five minutes after creation.
//! Accepting one records an active membership; rejecting one only marks
//! the invite. Only the invited user may respond, and only while the
//! invite is still pending and unexpired.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use findecisions_core::domain::{InviteStatus, ProjectInvite, ProjectMember};
use findecisions_core::error::ApiError;
use findecisions_core::storage::Paginated;

use crate::models::{CreateInviteRequest, ListQuery};
use crate::state::AppState;

use super::{created, ok, AppError, CurrentUser, HandlerResult};

/// How long an invite stays answerable.
const INVITE_TTL_MINUTES: i64 = 5;

pub async fn create_invite(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateInviteRequest>,
) -> HandlerResult<impl IntoResponse> {
    let project = state
        .project_store
        .get_project(request.project_id)
        .await?
        .ok_or(AppError(ApiError::NotFound))?;

    // Only the project admin may invite; non-admins can't learn whether
    // the project exists.
    if project.admin_id != user.id {
        return Err(AppError(ApiError::NotFound));
    }

    if state.users.get_user(request.target).await?.is_none() {
        return Err(AppError(ApiError::NotFound));
    }

    let already_member = request.target == project.admin_id
        || state
            .members
            .is_active_member(request.project_id, request.target)
            .await?;
    if already_member {
        return Err(AppError(ApiError::Conflict(
            "User is already a member of this project".to_string(),
        )));
    }

    let invite = ProjectInvite::new(
        request.project_id,
        user.id,
        request.target,
        chrono::Duration::minutes(INVITE_TTL_MINUTES),
    );
    state.invites.create_invite(&invite).await?;

    Ok(created("Invite sent successfully", invite))
}

pub async fn list_sent_invites(
    State(state): State<AppState>,
    user: CurrentUser,
) -> HandlerResult<impl IntoResponse> {
    let invites = state.invites.list_by_inviter(user.id).await?;
    Ok(ok("Sent invites fetched successfully", invites))
}

pub async fn list_received_invites(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> HandlerResult<impl IntoResponse> {
    let (page, limit) = query.normalized();
    let skip = (page - 1) * limit;

    let page_data = state.invites.list_for_target(user.id, limit, skip).await?;
    let listing = Paginated::from_page(page_data, limit, skip);

    Ok(ok("Received invites fetched successfully", listing))
}

/// Loads an invite the acting user is allowed to answer right now.
async fn load_answerable(
    state: &AppState,
    user: &CurrentUser,
    id: Uuid,
) -> Result<ProjectInvite, AppError> {
    let invite = state
        .invites
        .get_invite(id)
        .await?
        .ok_or(AppError(ApiError::NotFound))?;

    if invite.target != user.id {
        return Err(AppError(ApiError::NotFound));
    }
    if invite.status != InviteStatus::Pending {
        return Err(AppError(ApiError::BadRequest(
            "Invite has already been responded to".to_string(),
        )));
    }
    if invite.is_expired(Utc::now()) {
        return Err(AppError(ApiError::BadRequest(
            "Invite has expired".to_string(),
        )));
    }

    Ok(invite)
}

pub async fn accept_invite(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    let invite = load_answerable(&state, &user, id).await?;

    // Membership first: if it fails, the invite stays answerable.
    state
        .members
        .add_member(&ProjectMember::active(invite.project_id, user.id))
        .await?;
    state
        .invites
        .set_status(id, InviteStatus::Accepted, Utc::now())
        .await?;

    Ok(ok("Invite accepted successfully", serde_json::Value::Null))
}

pub async fn reject_invite(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    load_answerable(&state, &user, id).await?;

    state
        .invites
        .set_status(id, InviteStatus::Rejected, Utc::now())
        .await?;

    Ok(ok("Invite rejected successfully", serde_json::Value::Null))
}
