//! Project route handlers.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use findecisions_core::error::ApiError;

use crate::models::{CreateProjectRequest, ListQuery, UpdateProjectRequest};
use crate::state::AppState;
use crate::storage::cached::{NewProject, ProjectPatch};

use super::{created, ok, AppError, CurrentUser, HandlerResult};

pub async fn create_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateProjectRequest>,
) -> HandlerResult<impl IntoResponse> {
    if request.name.trim().is_empty() {
        return Err(AppError(ApiError::BadRequest(
            "Project name is required".to_string(),
        )));
    }

    let project = state
        .projects
        .create(
            user.id,
            NewProject {
                name: request.name,
                description: request.description,
                public: request.public,
            },
        )
        .await?;

    Ok(created("Project created successfully", project))
}

pub async fn list_projects(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> HandlerResult<impl IntoResponse> {
    let (page, limit) = query.normalized();
    let listing = state.projects.get_owned(user.id, page, limit).await?;
    Ok(ok("Projects fetched successfully", listing))
}

pub async fn list_public_projects(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> HandlerResult<impl IntoResponse> {
    let (page, limit) = query.normalized();
    let listing = state.projects.get_public(page, limit).await?;
    Ok(ok("Public projects fetched successfully", listing))
}

pub async fn get_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    let project = state.projects.get_one(user.id, id).await?;
    Ok(ok("Project fetched successfully", project))
}

pub async fn update_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProjectRequest>,
) -> HandlerResult<impl IntoResponse> {
    let project = state
        .projects
        .update(
            user.id,
            id,
            ProjectPatch {
                name: request.name,
                description: request.description,
                public: request.public,
            },
        )
        .await?;

    Ok(ok("Project updated successfully", project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    state.projects.delete(user.id, id).await?;
    Ok(ok("Project deleted successfully", serde_json::Value::Null))
}

/// Members are visible to the project admin and active members only;
/// everyone else gets the same `NotFound` the project reads use.
pub async fn list_members(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    let project = state
        .project_store
        .get_project(id)
        .await?
        .ok_or(AppError(ApiError::NotFound))?;

    let allowed =
        project.admin_id == user.id || state.members.is_active_member(id, user.id).await?;
    if !allowed {
        return Err(AppError(ApiError::NotFound));
    }

    let members = state.members.list_members(id).await?;
    Ok(ok("Members fetched successfully", members))
}
