use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{dto::user::SyncUserRequest, error::StorageError, models::User};
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/users/sync",
    request_body = SyncUserRequest,
    responses(
        (status = 200, description = "User profile synced", body = User),
        (status = 400, description = "Invalid profile data")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn sync_user(
    State(state): State<AppState>,
    Json(req): Json<SyncUserRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let user = services::sync_user(state.store.as_ref(), &req).await?;

    Ok(Json(user).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, WebError> {
    let user = services::get_user(state.store.as_ref(), &user_id)
        .await?
        .ok_or(WebError::Storage(StorageError::NotFound))?;

    Ok(Json(user).into_response())
}
