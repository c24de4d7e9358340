use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An immutable chat message, ordered by timestamp ascending within its
/// channel (global when `challenge_id` is absent, otherwise per-challenge).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub user_id: String,
    pub user_name: String,
    pub user_image: Option<String>,
    pub challenge_id: Option<Uuid>,
    pub sent_at: DateTime<Utc>,
}
