use uuid::Uuid;

use storage::{Store, dto::message::PostMessageRequest, error::Result, models::ChatMessage};

pub async fn post_message(store: &dyn Store, req: &PostMessageRequest) -> Result<ChatMessage> {
    store.add_message(req).await
}

/// Messages in a channel, oldest first, so clients can poll and append.
pub async fn list_messages(
    store: &dyn Store,
    challenge_id: Option<Uuid>,
    limit: u32,
) -> Result<Vec<ChatMessage>> {
    store.messages(challenge_id, limit).await
}
