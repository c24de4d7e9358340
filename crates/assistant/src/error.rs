use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Model API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Model returned an empty completion")]
    EmptyCompletion,

    #[error("No API key configured")]
    NotConfigured,
}
