use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    dto::message::{MessageQuery, PostMessageRequest},
    models::ChatMessage,
};
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = PostMessageRequest,
    responses(
        (status = 200, description = "Message posted", body = ChatMessage),
        (status = 400, description = "Invalid message"),
        (status = 404, description = "Challenge channel not found")
    ),
    security(("bearer_auth" = [])),
    tag = "community"
)]
pub async fn post_message(
    State(state): State<AppState>,
    Json(req): Json<PostMessageRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let message = services::post_message(state.store.as_ref(), &req).await?;

    Ok(Json(message).into_response())
}

#[utoipa::path(
    get,
    path = "/api/messages",
    params(MessageQuery),
    responses(
        (status = 200, description = "Channel messages, oldest first", body = Vec<ChatMessage>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "community"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let messages =
        services::list_messages(state.store.as_ref(), query.challenge_id, query.limit).await?;

    Ok(Json(messages).into_response())
}
