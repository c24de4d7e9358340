use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AssistantError;

pub const NOT_CONFIGURED_MESSAGE: &str = "I'm currently unable to provide a response as my \
connection to the model provider is not configured. Please set a valid OPENAI_API_KEY in the \
server environment.";

pub const INVALID_KEY_MESSAGE: &str = "The OpenAI API key appears to be invalid. It should \
start with 'sk-'. Please check the server environment and set a valid API key.";

pub const GENERIC_ERROR_MESSAGE: &str =
    "Sorry, I encountered an error. Please try again later.";

/// A chat answer. `degraded` marks canned text served in place of a model
/// reply, so clients can surface a hint without treating it as a failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatReply {
    pub message: String,
    pub degraded: bool,
}

impl ChatReply {
    pub fn from_model(message: String) -> Self {
        Self {
            message,
            degraded: false,
        }
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            degraded: true,
        }
    }
}

/// Pick a user-facing message for a failed model call.
pub fn degraded_message(err: &AssistantError) -> &'static str {
    match err {
        AssistantError::ApiError { status: 401, .. } => {
            "The OpenAI API key is invalid or missing. Please check the server environment \
and set a valid API key."
        }
        AssistantError::ApiError { status: 429, .. } => {
            "The OpenAI API rate limit has been reached. Please try again in a few moments."
        }
        _ => GENERIC_ERROR_MESSAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_key_hint() {
        let err = AssistantError::ApiError {
            status: 401,
            body: String::new(),
        };
        assert!(degraded_message(&err).contains("API key"));
    }

    #[test]
    fn rate_limit_maps_to_retry_hint() {
        let err = AssistantError::ApiError {
            status: 429,
            body: String::new(),
        };
        assert!(degraded_message(&err).contains("rate limit"));
    }

    #[test]
    fn other_errors_get_the_generic_message() {
        assert_eq!(
            degraded_message(&AssistantError::EmptyCompletion),
            GENERIC_ERROR_MESSAGE
        );
    }
}
