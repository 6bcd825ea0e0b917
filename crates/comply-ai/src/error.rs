//! Provider error taxonomy shared by all outbound clients

use thiserror::Error;

/// Errors from outbound AI providers
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider API key is not configured: {0}")]
    MissingApiKey(&'static str),

    #[error("Provider rate limit hit (429): {0}")]
    RateLimited(String),

    #[error("Provider quota exhausted (402): {0}")]
    QuotaExhausted(String),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider reply had no usable content")]
    MissingContent,

    #[error("Could not parse provider reply: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Classify a non-success HTTP status with its response body
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => Self::RateLimited(body),
            402 => Self::QuotaExhausted(body),
            _ => Self::Status { status, body },
        }
    }

    /// Whether another attempt could plausibly succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Transport(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
