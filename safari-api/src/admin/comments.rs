use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use safari_core::admin::{Comment, CommentStatus};
use safari_core::{ListQuery, Page};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub status: CommentStatus,
}

/// GET /api/admin/comments
pub async fn list_comments(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Page<Comment>>, AppError> {
    Ok(Json(state.comments.list_comments(&query).await?))
}

/// PATCH /api/admin/comments/{id}
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    let comment = state.comments.set_comment_status(id, req.status).await?;
    info!("Comment {} marked {}", id, comment.status);
    Ok(Json(comment))
}

/// DELETE /api/admin/comments/{id}
pub async fn delete_comment(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    state.comments.delete_comment(id).await?;
    info!("Comment {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
