//! Error Types for the Analyzer

use pulse_core::PulseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Shown when a failure carries no message of its own
pub const FALLBACK_MESSAGE: &str = "Failed to analyze pair. Please try again.";

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Enter a trading pair to analyze")]
    EmptySymbol,

    /// Model text was not the JSON document the schema asked for
    #[error("Invalid response format from AI")]
    InvalidResponse,

    /// Transport or API-level failure from the provider
    #[error(transparent)]
    Remote(#[from] PulseError),
}

impl AnalyzerError {
    /// Single user-facing message for the error banner
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Remote(err) => err.user_message(),
            other => other.to_string(),
        };

        if message.trim().is_empty() {
            FALLBACK_MESSAGE.into()
        } else {
            message
        }
    }
}
