use assistant::{ChatReply, ChatTurn, Recommendations, WasteScan};
use axum::{
    Json,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use storage::error::StorageError;
use utoipa::ToSchema;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecommendationRequest {
    pub user_id: String,
}

#[utoipa::path(
    post,
    path = "/api/assistant/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Eco coach reply, canned when the model is unavailable", body = ChatReply),
        (status = 400, description = "Empty conversation")
    ),
    security(("bearer_auth" = [])),
    tag = "assistant"
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Response, WebError> {
    if req.messages.is_empty() {
        return Err(WebError::BadRequest(
            "At least one message is required".to_string(),
        ));
    }

    let reply = services::chat(&state.assistant, &req.messages).await;

    Ok(Json(reply).into_response())
}

#[utoipa::path(
    post,
    path = "/api/assistant/recommendations",
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "Personalized goals, canned when the model is unavailable", body = Recommendations),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "assistant"
)]
pub async fn recommendations(
    State(state): State<AppState>,
    Json(req): Json<RecommendationRequest>,
) -> Result<Response, WebError> {
    if req.user_id.trim().is_empty() {
        return Err(WebError::BadRequest("User id is required".to_string()));
    }

    let recommendations =
        services::recommend(state.store.as_ref(), &state.assistant, &req.user_id)
            .await?
            .ok_or(WebError::Storage(StorageError::NotFound))?;

    Ok(Json(recommendations).into_response())
}

#[utoipa::path(
    post,
    path = "/api/assistant/waste-scan",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Form with an `image` file field"),
    responses(
        (status = 200, description = "Waste classification, low-confidence fallback when the model is unavailable", body = WasteScan),
        (status = 400, description = "No image file provided")
    ),
    security(("bearer_auth" = [])),
    tag = "assistant"
)]
pub async fn waste_scan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("image") {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| WebError::BadRequest(format!("Failed to read image: {e}")))?;
            image = Some((bytes.to_vec(), content_type));
        }
    }

    let Some((bytes, content_type)) = image else {
        return Err(WebError::BadRequest("No image file provided".to_string()));
    };
    if bytes.is_empty() {
        return Err(WebError::BadRequest("Image file is empty".to_string()));
    }

    let scan = services::scan_waste(&state.assistant, &bytes, &content_type).await;

    Ok(Json(scan).into_response())
}
