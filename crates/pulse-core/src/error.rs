//! Error Types

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, PulseError>;

/// Provider-level error types
#[derive(Error, Debug)]
pub enum PulseError {
    /// Remote service returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed (missing or rejected API key)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Response envelope could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl PulseError {
    /// User-facing text, with the remote message appended when present.
    ///
    /// Empty when the error carries no message at all; callers supply
    /// their own fallback in that case.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidResponse(_) | Self::Json(_) => "Invalid response format from AI".into(),
            Self::Other(msg) => msg.trim().to_string(),
            Self::Provider(msg)
            | Self::ProviderUnavailable(msg)
            | Self::RateLimited(msg)
            | Self::Auth(msg)
            | Self::Config(msg) => {
                let msg = msg.trim();
                if msg.is_empty() {
                    return String::new();
                }
                match self {
                    Self::ProviderUnavailable(_) => {
                        format!("The AI service is currently unavailable: {msg}")
                    }
                    Self::RateLimited(_) => format!("Too many requests: {msg}"),
                    Self::Auth(_) => format!("Authentication failed: {msg}"),
                    Self::Config(_) => format!("The AI service is misconfigured: {msg}"),
                    _ => format!("The AI service encountered an error: {msg}"),
                }
            }
        }
    }
}

impl From<anyhow::Error> for PulseError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
