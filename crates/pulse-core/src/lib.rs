//! # pulse-core
//!
//! Provider-agnostic LLM abstraction for the CryptoPulse analyzer.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      MarketAnalyzer                          │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌───────────────┐   │
//! │  │    Prompt    │  │ GenerationOptions│  │  LlmProvider  │   │
//! │  │  + Schema    │──│ (schema, search) │──│  (Strategy)   │   │
//! │  └──────────────┘  └──────────────────┘  └───────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets the analyzer run against Gemini, a local
//! Ollama instance, or a scripted test double without touching callers.

pub mod error;
pub mod message;
pub mod provider;

pub use error::{PulseError, Result};
pub use message::{Message, Role};
pub use provider::{
    Completion, FinishReason, GenerationOptions, GroundingChunk, LlmProvider, ModelInfo,
    ProviderInfo, TokenUsage, WebReference,
};
