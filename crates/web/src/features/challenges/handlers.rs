use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::dto::challenge::{
    ChallengeProgressRequest, ChallengeResponse, CompleteChallengeRequest, CompletionResponse,
    CreateChallengeRequest, JoinChallengeRequest, ProgressResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/challenges",
    request_body = CreateChallengeRequest,
    responses(
        (status = 200, description = "Challenge created", body = ChallengeResponse),
        (status = 400, description = "Invalid challenge data")
    ),
    security(("bearer_auth" = [])),
    tag = "challenges"
)]
pub async fn create_challenge(
    State(state): State<AppState>,
    Json(req): Json<CreateChallengeRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let challenge = services::create_challenge(state.store.as_ref(), &req).await?;

    Ok(Json(ChallengeResponse::from(challenge)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/challenges/active",
    responses(
        (status = 200, description = "Challenges whose window has not closed, soonest-ending first", body = Vec<ChallengeResponse>)
    ),
    tag = "challenges"
)]
pub async fn active_challenges(State(state): State<AppState>) -> Result<Response, WebError> {
    let challenges = services::active_challenges(state.store.as_ref()).await?;

    let response: Vec<ChallengeResponse> = challenges
        .into_iter()
        .map(ChallengeResponse::from)
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/challenges/{challenge_id}",
    params(
        ("challenge_id" = Uuid, Path, description = "Challenge id")
    ),
    responses(
        (status = 200, description = "Challenge found", body = ChallengeResponse),
        (status = 404, description = "Challenge not found")
    ),
    tag = "challenges"
)]
pub async fn get_challenge(
    State(state): State<AppState>,
    Path(challenge_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let challenge = services::get_challenge(state.store.as_ref(), challenge_id).await?;

    Ok(Json(ChallengeResponse::from(challenge)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/challenges/user/{user_id}",
    params(
        ("user_id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Challenges the user participates in, most recently started first", body = Vec<ChallengeResponse>)
    ),
    tag = "challenges"
)]
pub async fn user_challenges(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, WebError> {
    let challenges = services::user_challenges(state.store.as_ref(), &user_id).await?;

    let response: Vec<ChallengeResponse> = challenges
        .into_iter()
        .map(ChallengeResponse::from)
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/challenges/{challenge_id}/join",
    params(
        ("challenge_id" = Uuid, Path, description = "Challenge id")
    ),
    request_body = JoinChallengeRequest,
    responses(
        (status = 200, description = "Joined the challenge", body = ChallengeResponse),
        (status = 404, description = "Challenge or user not found"),
        (status = 409, description = "Already joined")
    ),
    security(("bearer_auth" = [])),
    tag = "challenges"
)]
pub async fn join_challenge(
    State(state): State<AppState>,
    Path(challenge_id): Path<Uuid>,
    Json(req): Json<JoinChallengeRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let challenge =
        services::join_challenge(state.store.as_ref(), challenge_id, &req.user_id).await?;

    Ok(Json(ChallengeResponse::from(challenge)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/challenges/{challenge_id}/progress",
    params(
        ("challenge_id" = Uuid, Path, description = "Challenge id")
    ),
    request_body = ChallengeProgressRequest,
    responses(
        (status = 200, description = "Progress recorded, step bonuses awarded", body = ProgressResponse),
        (status = 400, description = "Invalid progress value"),
        (status = 404, description = "Challenge not found"),
        (status = 409, description = "Not a participant")
    ),
    security(("bearer_auth" = [])),
    tag = "challenges"
)]
pub async fn record_progress(
    State(state): State<AppState>,
    Path(challenge_id): Path<Uuid>,
    Json(req): Json<ChallengeProgressRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let progress = services::record_progress(
        state.store.as_ref(),
        challenge_id,
        &req.user_id,
        req.progress_percent,
    )
    .await?;

    Ok(Json(progress).into_response())
}

#[utoipa::path(
    post,
    path = "/api/challenges/{challenge_id}/complete",
    params(
        ("challenge_id" = Uuid, Path, description = "Challenge id")
    ),
    request_body = CompleteChallengeRequest,
    responses(
        (status = 200, description = "Challenge completed, bonus awarded", body = CompletionResponse),
        (status = 404, description = "Challenge not found"),
        (status = 409, description = "Not a participant or already completed")
    ),
    security(("bearer_auth" = [])),
    tag = "challenges"
)]
pub async fn complete_challenge(
    State(state): State<AppState>,
    Path(challenge_id): Path<Uuid>,
    Json(req): Json<CompleteChallengeRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let outcome = services::complete_challenge(
        state.store.as_ref(),
        challenge_id,
        &req.user_id,
        req.impact_value,
    )
    .await?;

    let response = CompletionResponse {
        challenge: ChallengeResponse::from(outcome.challenge),
        points_awarded: outcome.points_awarded,
    };

    Ok(Json(response).into_response())
}
