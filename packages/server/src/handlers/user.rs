use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::json::AppJson;
use crate::models::shared::{DeleteResponse, parse_id};
use crate::models::user::*;
use crate::state::AppState;

#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.repos.users.create(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<UserListResponse>, AppError> {
    let users = state.repos.users.list(filter).await?;
    Ok(Json(UserListResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let id = parse_id(&id, "id")?;
    let user = state.repos.users.get(id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let id = parse_id(&id, "id")?;
    let user = state.repos.users.update(id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Delete a user with all of their blogs and comments.
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id(&id, "id")?;
    let report = state.repos.users.delete(id).await?;
    Ok(Json(DeleteResponse {
        deleted: report.deleted,
    }))
}
