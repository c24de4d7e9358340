use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use storage::dto::{common::LimitParams, leaderboard::LeaderboardEntry};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    params(LimitParams),
    responses(
        (status = 200, description = "Top users by points, ties broken by user id", body = Vec<LeaderboardEntry>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Response, WebError> {
    params.validate().map_err(WebError::BadRequest)?;

    let entries = services::top(state.store.as_ref(), params.limit).await?;

    Ok(Json(entries).into_response())
}
