use storage::models::{ImpactMetric, User};

pub mod chat;
pub mod client;
pub mod error;
pub mod goals;
pub mod prompts;
pub mod waste;

pub use chat::ChatReply;
pub use client::{ChatClient, ChatTurn};
pub use error::{AssistantError, Result};
pub use goals::{Goal, Recommendations};
pub use waste::WasteScan;

const CHAT_MAX_TOKENS: u32 = 500;
const RECOMMENDATION_MAX_TOKENS: u32 = 500;
const WASTE_MAX_TOKENS: u32 = 1000;

enum Availability {
    Ready(ChatClient),
    MissingKey,
    InvalidKey,
}

/// AI surface of the service. Every call degrades to canned output instead
/// of failing, so a broken or absent model configuration never breaks the
/// endpoints that use it.
pub struct Assistant {
    availability: Availability,
}

impl Assistant {
    /// Build from configuration. A missing key or one that does not look
    /// like an OpenAI key ("sk-...") yields a degraded assistant.
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        let availability = match api_key {
            None => {
                tracing::warn!("OPENAI_API_KEY is not set; assistant runs degraded");
                Availability::MissingKey
            }
            Some(key) if !key.starts_with("sk-") => {
                tracing::warn!("OPENAI_API_KEY does not look like an OpenAI key; assistant runs degraded");
                Availability::InvalidKey
            }
            Some(key) => Availability::Ready(ChatClient::new(base_url, key, model)),
        };

        Self { availability }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.availability, Availability::Ready(_))
    }

    /// Answer a chat conversation as the eco coach. Never fails.
    pub async fn chat_reply(&self, history: &[ChatTurn]) -> ChatReply {
        let client = match &self.availability {
            Availability::Ready(client) => client,
            Availability::MissingKey => return ChatReply::degraded(chat::NOT_CONFIGURED_MESSAGE),
            Availability::InvalidKey => return ChatReply::degraded(chat::INVALID_KEY_MESSAGE),
        };

        let mut turns = Vec::with_capacity(history.len() + 1);
        turns.push(ChatTurn::system(prompts::CHAT_SYSTEM_PROMPT));
        turns.extend_from_slice(history);

        match client.chat(&turns, CHAT_MAX_TOKENS).await {
            Ok(message) => ChatReply::from_model(message),
            Err(err) => {
                tracing::error!("Chat completion failed: {err}");
                ChatReply::degraded(chat::degraded_message(&err))
            }
        }
    }

    /// Suggest personalized goals from a user's history. Never fails; the
    /// canned goal list is served whenever the model cannot answer.
    pub async fn recommend(&self, user: &User, metrics: &[ImpactMetric]) -> Recommendations {
        let client = match &self.availability {
            Availability::Ready(client) => client,
            Availability::MissingKey => {
                return Recommendations::fallback(
                    "OpenAI API key is not configured. Set OPENAI_API_KEY to enable \
personalized recommendations.",
                );
            }
            Availability::InvalidKey => return Recommendations::fallback(chat::INVALID_KEY_MESSAGE),
        };

        let turns = [
            ChatTurn::system(prompts::RECOMMENDATION_SYSTEM_PROMPT),
            ChatTurn::user(prompts::recommendation_prompt(user, metrics)),
        ];

        match client.chat(&turns, RECOMMENDATION_MAX_TOKENS).await {
            Ok(text) => Recommendations::from_model(text),
            Err(err) => {
                tracing::error!("Recommendation completion failed: {err}");
                Recommendations::fallback(chat::degraded_message(&err))
            }
        }
    }

    /// Classify a waste item from a photo. Never fails; unusable or missing
    /// model output becomes the low-confidence fallback scan.
    pub async fn scan_waste(&self, image: &[u8], content_type: &str) -> WasteScan {
        let client = match &self.availability {
            Availability::Ready(client) => client,
            Availability::MissingKey | Availability::InvalidKey => return WasteScan::fallback(),
        };

        let raw = match client
            .chat_with_image(
                prompts::WASTE_SYSTEM_PROMPT,
                prompts::WASTE_USER_PROMPT,
                image,
                content_type,
                WASTE_MAX_TOKENS,
            )
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!("Waste scan completion failed: {err}");
                return WasteScan::fallback();
            }
        };

        match waste::parse_scan(&raw) {
            Ok(scan) => scan,
            Err(err) => {
                tracing::error!("Waste scan returned unparseable output: {err}");
                WasteScan::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: "u1".into(),
            name: "Jamie".into(),
            email: "jamie@example.com".into(),
            image: String::new(),
            points: 0,
            badges: vec![],
            sustainability_score: 0.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn degraded_assistant() -> Assistant {
        Assistant::new(
            "https://api.openai.com/v1".to_string(),
            None,
            "gpt-4o-mini".to_string(),
        )
    }

    #[test]
    fn bad_key_format_is_degraded() {
        let assistant = Assistant::new(
            "https://api.openai.com/v1".to_string(),
            Some("not-a-key".to_string()),
            "gpt-4o-mini".to_string(),
        );
        assert!(!assistant.is_ready());
    }

    #[tokio::test]
    async fn chat_without_key_returns_configuration_hint() {
        let reply = degraded_assistant()
            .chat_reply(&[ChatTurn::user("How can I save water?")])
            .await;
        assert!(reply.degraded);
        assert_eq!(reply.message, chat::NOT_CONFIGURED_MESSAGE);
    }

    #[tokio::test]
    async fn recommend_without_key_serves_fallback_goals() {
        let recs = degraded_assistant().recommend(&user(), &[]).await;
        assert!(recs.degraded);
        assert_eq!(recs.goals.len(), 3);
        assert_eq!(recs.goals[0].goal, "Reduce water usage");
    }

    #[tokio::test]
    async fn waste_scan_without_key_serves_low_confidence_fallback() {
        let scan = degraded_assistant().scan_waste(&[0xFF, 0xD8], "image/jpeg").await;
        assert_eq!(scan.confidence_level, "Low");
    }
}
