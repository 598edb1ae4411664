//! LLM Providers
//!
//! One request in, one [`Completion`] out. Gemini, Ollama and test doubles
//! all sit behind [`LlmProvider`]; structured output and search grounding
//! are requested through [`GenerationOptions`] and ignored by backends that
//! lack them (see [`ProviderInfo`]).
//!
//! ## Example
//!
//! ```rust,ignore
//! use pulse_core::provider::{GenerationOptions, LlmProvider};
//!
//! let provider = GeminiProvider::from_env()?;
//! let options = GenerationOptions {
//!     response_schema: Some(schema),
//!     web_search: true,
//!     ..GenerationOptions::default()
//! };
//! let completion = provider.complete(&[Message::user(prompt)], &options).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;

/// Knobs for a single completion request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gemini-3-flash-preview", "llama3.2").
    /// Empty means "whatever the provider is configured with".
    #[serde(default)]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default)]
    pub stop_sequences: Vec<String>,

    /// Extra system text placed ahead of any system messages
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// JSON Schema the response must follow (lowercase type names).
    /// When set the provider asks for `application/json` output.
    #[serde(default)]
    pub response_schema: Option<serde_json::Value>,

    /// Ask the provider to ground the answer with live web search
    #[serde(default)]
    pub web_search: bool,
}

const fn default_temperature() -> f32 {
    0.7
}
const fn default_max_tokens() -> u32 {
    8192
}
const fn default_top_p() -> f32 {
    0.95
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            stop_sequences: Vec::new(),
            system_prompt: None,
            response_schema: None,
            web_search: false,
        }
    }
}

/// What a provider returned for one request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// Concatenated answer text (reasoning parts excluded)
    pub content: String,

    /// Model version reported by the backend, else the one requested
    pub model: String,

    pub usage: Option<TokenUsage>,

    /// Output hit the token cap
    pub truncated: bool,

    pub finish_reason: Option<FinishReason>,

    /// Search citations, in the order the backend listed them
    #[serde(default)]
    pub grounding: Vec<GroundingChunk>,
}

impl Completion {
    /// A plain text completion with no usage or grounding data
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            usage: None,
            truncated: false,
            finish_reason: Some(FinishReason::Stop),
            grounding: Vec::new(),
        }
    }

    /// Attach grounding chunks
    #[must_use]
    pub fn with_grounding(mut self, grounding: Vec<GroundingChunk>) -> Self {
        self.grounding = grounding;
        self
    }
}

/// A citation-like entry used to ground a response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    /// Web page the answer drew on, if the chunk came from web search
    #[serde(default)]
    pub web: Option<WebReference>,
}

impl GroundingChunk {
    /// Chunk backed by a web page
    pub fn web(uri: impl Into<String>, title: Option<&str>) -> Self {
        Self {
            web: Some(WebReference {
                uri: Some(uri.into()),
                title: title.map(Into::into),
            }),
        }
    }
}

/// Web page reference inside a grounding chunk
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebReference {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Why generation stopped
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Error,
}

/// Backend description served on `/api/models`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,

    /// Model used when options leave it empty
    pub default_model: String,

    pub models: Vec<ModelInfo>,

    /// Whether `web_search` is honored
    pub supports_web_search: bool,

    /// Whether `response_schema` is honored
    pub supports_structured_output: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub context_length: Option<u32>,
}

/// A text-generation backend
///
/// `complete` makes exactly one remote call and never retries; failures
/// come back as [`crate::PulseError`] variants the server can map to HTTP
/// statuses.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn info(&self) -> Result<ProviderInfo>;

    /// `Ok(false)` when the backend answers but is unusable
    async fn health_check(&self) -> Result<bool>;

    async fn complete(&self, messages: &[Message], options: &GenerationOptions)
    -> Result<Completion>;

    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// Rough prompt size for logging, about four bytes per token
    #[allow(clippy::cast_possible_truncation)]
    fn estimate_tokens(&self, text: &str) -> u32 {
        (text.len() / 4) as u32
    }
}
