//! Decision route handlers.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use findecisions_core::error::ApiError;

use crate::models::{CreateDecisionRequest, DecisionListQuery, UpdateDecisionRequest};
use crate::state::AppState;
use crate::storage::cached::{DecisionPatch, NewDecision};

use super::{created, ok, AppError, CurrentUser, HandlerResult};

pub async fn create_decision(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateDecisionRequest>,
) -> HandlerResult<impl IntoResponse> {
    if request.action.trim().is_empty()
        || request.reason.trim().is_empty()
        || request.outcome.trim().is_empty()
    {
        return Err(AppError(ApiError::BadRequest(
            "Missing required fields".to_string(),
        )));
    }

    let decision = state
        .decisions
        .create(
            user.id,
            NewDecision {
                project_id: request.project_id,
                action: request.action,
                reason: request.reason,
                outcome: request.outcome,
                context: request.context,
            },
        )
        .await?;

    Ok(created("Decision recorded successfully", decision))
}

pub async fn list_decisions(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<DecisionListQuery>,
) -> HandlerResult<impl IntoResponse> {
    let project_id = query.project_id.ok_or(AppError(ApiError::BadRequest(
        "projectId is required".to_string(),
    )))?;

    let page = query.page.max(1);
    let limit = query.limit.max(1);
    let listing = state
        .decisions
        .get_by_project(user.id, project_id, page, limit)
        .await?;

    Ok(ok("Decisions fetched successfully", listing))
}

pub async fn get_decision(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    let decision = state.decisions.get_one(user.id, id).await?;
    Ok(ok("Decision fetched successfully", decision))
}

pub async fn update_decision(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDecisionRequest>,
) -> HandlerResult<impl IntoResponse> {
    let decision = state
        .decisions
        .update(
            user.id,
            id,
            DecisionPatch {
                action: request.action,
                reason: request.reason,
                outcome: request.outcome,
                context: request.context,
            },
        )
        .await?;

    Ok(ok("Decision updated successfully", decision))
}

pub async fn delete_decision(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    state.decisions.delete(user.id, id).await?;
    Ok(ok("Decision deleted successfully", serde_json::Value::Null))
}
