//! # pulse-runtime
//!
//! Runtime providers for the crypto-pulse analyzer.
//!
//! ## Providers
//!
//! - **Gemini** (default): hosted model with Google Search grounding and
//!   schema-constrained JSON output
//! - **Ollama**: local inference with schema-constrained output, no search
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pulse_runtime::GeminiProvider;
//!
//! let provider = Arc::new(GeminiProvider::from_env()?);
//! let analyzer = LlmAnalyzer::new(provider);
//! ```

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use pulse_core::{GenerationOptions, LlmProvider, Message, PulseError, Result, Role};

/// Map a transport failure onto the provider error space
pub(crate) fn transport_error(err: &reqwest::Error) -> PulseError {
    if err.is_timeout() {
        PulseError::ProviderUnavailable(format!("request timed out: {err}"))
    } else if err.is_connect() {
        PulseError::ProviderUnavailable(format!("connection failed: {err}"))
    } else if err.is_decode() {
        PulseError::InvalidResponse(err.to_string())
    } else {
        PulseError::ProviderUnavailable(err.to_string())
    }
}
