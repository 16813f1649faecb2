use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::json::AppJson;
use crate::models::comment::*;
use crate::models::shared::{DeleteResponse, parse_id};
use crate::state::AppState;

#[instrument(skip(state, payload), fields(blog_id = %payload.blog_id, user_id = %payload.user_id))]
pub async fn create_comment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let comment = state.repos.comments.create(payload).await?;
    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

#[instrument(skip(state, query))]
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<CommentListResponse>, AppError> {
    let filter = CommentFilter::try_from(query)?;
    let comments = state.repos.comments.list(filter).await?;
    Ok(Json(CommentListResponse {
        data: comments.into_iter().map(CommentResponse::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn get_comment(
    State(state): State<AppState>,
    Path((blog_id, user_id)): Path<(String, String)>,
) -> Result<Json<CommentResponse>, AppError> {
    let blog_id = parse_id(&blog_id, "blog_id")?;
    let user_id = parse_id(&user_id, "user_id")?;
    let comment = state.repos.comments.get(blog_id, user_id).await?;
    Ok(Json(CommentResponse::from(comment)))
}

#[instrument(skip(state, payload))]
pub async fn update_comment(
    State(state): State<AppState>,
    Path((blog_id, user_id)): Path<(String, String)>,
    AppJson(payload): AppJson<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let blog_id = parse_id(&blog_id, "blog_id")?;
    let user_id = parse_id(&user_id, "user_id")?;
    let comment = state
        .repos
        .comments
        .update(blog_id, user_id, payload)
        .await?;
    Ok(Json(CommentResponse::from(comment)))
}

#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    Path((blog_id, user_id)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>, AppError> {
    let blog_id = parse_id(&blog_id, "blog_id")?;
    let user_id = parse_id(&user_id, "user_id")?;
    let deleted = state.repos.comments.delete(blog_id, user_id).await?;
    Ok(Json(DeleteResponse {
        deleted: vec![deleted],
    }))
}
