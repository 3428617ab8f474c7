use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Error, Debug)]
pub enum KonspektError {
    #[error("Invalid video URL: {url:?}")]
    InvalidUrl { url: String },

    #[error("AI request failed: {reason}")]
    AiRequest { reason: String },

    #[error("Invalid AI response format: {reason}")]
    AiResponseFormat { reason: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl KonspektError {
    /// Text safe to show to an end user. Causes stay in the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            KonspektError::InvalidUrl { url } if url.trim().is_empty() => {
                "Please enter a YouTube URL"
            }
            KonspektError::InvalidUrl { .. } => "Please enter a valid YouTube URL",
            KonspektError::Provider(_) => "AI provider is not configured",
            _ => "Failed to analyze video. Please try again.",
        }
    }

    /// Failures of the structuring stage, the only fatal stage after resolving.
    pub fn is_ai_failure(&self) -> bool {
        matches!(
            self,
            KonspektError::AiRequest { .. } | KonspektError::AiResponseFormat { .. }
        )
    }
}

/// Why a live lookup fell back to synthesized data.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("relay returned no contents")]
    EmptyContents,

    #[error("caption payload has no event list")]
    MissingEvents,
}

pub type Result<T> = std::result::Result<T, KonspektError>;
