use assistant::{Assistant, ChatReply, ChatTurn, Recommendations, WasteScan};
use storage::{Store, error::Result};

pub async fn chat(assistant: &Assistant, history: &[ChatTurn]) -> ChatReply {
    assistant.chat_reply(history).await
}

/// Look up the user's profile and history and ask the assistant for goals.
/// The lookup can fail; the assistant call cannot.
pub async fn recommend(
    store: &dyn Store,
    assistant: &Assistant,
    user_id: &str,
) -> Result<Option<Recommendations>> {
    let Some(user) = store.get_user(user_id).await? else {
        return Ok(None);
    };
    let metrics = store.user_impact_metrics(user_id).await?;

    Ok(Some(assistant.recommend(&user, &metrics).await))
}

pub async fn scan_waste(assistant: &Assistant, image: &[u8], content_type: &str) -> WasteScan {
    assistant.scan_waste(image, content_type).await
}
