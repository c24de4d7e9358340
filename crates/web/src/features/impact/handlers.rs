use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    dto::impact::{ActivityLoggedResponse, LogImpactRequest},
    models::ImpactMetric,
    services::scoring::ImpactSummary,
};
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/impact",
    request_body = LogImpactRequest,
    responses(
        (status = 200, description = "Activity logged and points awarded", body = ActivityLoggedResponse),
        (status = 400, description = "Invalid activity data"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "impact"
)]
pub async fn log_activity(
    State(state): State<AppState>,
    Json(req): Json<LogImpactRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let logged = services::log_activity(state.store.as_ref(), &req).await?;

    Ok(Json(logged).into_response())
}

#[utoipa::path(
    get,
    path = "/api/impact/{user_id}",
    params(
        ("user_id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User's logged activities, newest first", body = Vec<ImpactMetric>)
    ),
    tag = "impact"
)]
pub async fn list_metrics(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, WebError> {
    let metrics = services::list_metrics(state.store.as_ref(), &user_id).await?;

    Ok(Json(metrics).into_response())
}

#[utoipa::path(
    get,
    path = "/api/impact/{user_id}/summary",
    params(
        ("user_id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Per-category totals and tangible equivalents", body = ImpactSummary)
    ),
    tag = "impact"
)]
pub async fn summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, WebError> {
    let summary = services::summary(state.store.as_ref(), &user_id).await?;

    Ok(Json(summary).into_response())
}
