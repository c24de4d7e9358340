use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: RequestContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
    detail: &'static str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions API.
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    /// Create a new chat client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://api.openai.com/v1")
    /// * `api_key` - Bearer token for the API
    /// * `model` - Model name (e.g., "gpt-4o-mini")
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }

    /// Run a text-only chat completion and return the assistant's reply.
    pub async fn chat(&self, turns: &[ChatTurn], max_tokens: u32) -> Result<String> {
        let messages = turns
            .iter()
            .map(|turn| RequestMessage {
                role: &turn.role,
                content: RequestContent::Text(&turn.content),
            })
            .collect();

        self.complete(messages, max_tokens).await
    }

    /// Run a vision completion: a system prompt, a user question, and one
    /// image inlined as a base64 data URL.
    pub async fn chat_with_image(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image: &[u8],
        content_type: &str,
        max_tokens: u32,
    ) -> Result<String> {
        let data_url = format!("data:{};base64,{}", content_type, BASE64.encode(image));
        let messages = vec![
            RequestMessage {
                role: "system",
                content: RequestContent::Text(system_prompt),
            },
            RequestMessage {
                role: "user",
                content: RequestContent::Parts(vec![
                    ContentPart::Text { text: user_prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: data_url,
                            detail: "high",
                        },
                    },
                ]),
            },
        ];

        self.complete(messages, max_tokens).await
    }

    async fn complete(&self, messages: Vec<RequestMessage<'_>>, max_tokens: u32) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: 0.7,
            max_tokens,
        };

        tracing::debug!(
            "Sending chat completion request (model: {}, messages: {})",
            self.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::ApiError { status, body });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AssistantError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Only run against a live API
    async fn test_simple_chat() {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap();
        let client = ChatClient::new(
            "https://api.openai.com/v1".to_string(),
            api_key,
            "gpt-4o-mini".to_string(),
        );

        let turns = vec![
            ChatTurn::system("Reply with a single word."),
            ChatTurn::user("Say hello."),
        ];
        let reply = client.chat(&turns, 50).await.unwrap();
        assert!(!reply.is_empty());
    }
}
