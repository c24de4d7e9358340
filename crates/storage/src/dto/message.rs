use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Request payload for posting a chat message
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PostMessageRequest {
    #[validate(length(min = 1, max = 4000, message = "Message content must not be empty"))]
    pub content: String,

    #[validate(length(min = 1, max = 255, message = "User id is required"))]
    pub user_id: String,

    #[validate(length(min = 1, max = 255, message = "User name is required"))]
    pub user_name: String,

    #[validate(length(max = 500))]
    pub user_image: Option<String>,

    /// Scopes the message to a challenge channel; absent means global chat.
    pub challenge_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct MessageQuery {
    pub challenge_id: Option<Uuid>,
    #[serde(default = "default_message_limit")]
    pub limit: u32,
}

fn default_message_limit() -> u32 {
    50
}

impl MessageQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 || self.limit > 500 {
            return Err("limit must be between 1 and 500".to_string());
        }
        Ok(())
    }
}
