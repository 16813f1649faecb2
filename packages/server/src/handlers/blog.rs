use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::json::AppJson;
use crate::models::blog::*;
use crate::models::shared::{DeleteResponse, parse_id};
use crate::state::AppState;

#[instrument(skip(state, payload), fields(user_id = %payload.user_id))]
pub async fn create_blog(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBlogRequest>,
) -> Result<impl IntoResponse, AppError> {
    let blog = state.repos.blogs.create(payload).await?;
    Ok((StatusCode::CREATED, Json(BlogResponse::from(blog))))
}

#[instrument(skip(state, query))]
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> Result<Json<BlogListResponse>, AppError> {
    let filter = BlogFilter::try_from(query)?;
    let blogs = state.repos.blogs.list(filter).await?;
    Ok(Json(BlogListResponse {
        data: blogs.into_iter().map(BlogResponse::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, AppError> {
    let id = parse_id(&id, "id")?;
    let blog = state.repos.blogs.get(id).await?;
    Ok(Json(BlogResponse::from(blog)))
}

#[instrument(skip(state, payload))]
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateBlogRequest>,
) -> Result<Json<BlogResponse>, AppError> {
    let id = parse_id(&id, "id")?;
    let blog = state.repos.blogs.update(id, payload).await?;
    Ok(Json(BlogResponse::from(blog)))
}

/// Delete a blog and every comment on it.
#[instrument(skip(state))]
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id(&id, "id")?;
    let report = state.repos.blogs.delete(id).await?;
    Ok(Json(DeleteResponse {
        deleted: report.deleted,
    }))
}
