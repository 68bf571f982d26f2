use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use safari_core::admin::User;
use safari_core::{ListQuery, Page};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::state::AppState;

const TEMPORARY_PASSWORD_LEN: usize = 12;

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub locked: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordResponse {
    pub user: User,
    pub temporary_password: String,
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Page<User>>, AppError> {
    Ok(Json(state.users.list_users(&query).await?))
}

/// PATCH /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let user = state.users.set_user_locked(id, req.locked).await?;
    info!("User {} {}", id, if user.is_locked { "locked" } else { "unlocked" });
    Ok(Json(user))
}

/// POST /api/admin/users/{id}/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResetPasswordResponse>, AppError> {
    let temporary_password = generate_temporary_password();
    let user = state.users.reset_password(id, &temporary_password).await?;
    info!("Password reset issued for user {}", id);
    Ok(Json(ResetPasswordResponse { user, temporary_password }))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    state.users.delete_user(id).await?;
    info!("User {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

fn generate_temporary_password() -> String {
    let mut raw = Uuid::new_v4().simple().to_string();
    raw.truncate(TEMPORARY_PASSWORD_LEN);
    raw
}
