//! Ollama LLM Provider
//!
//! Implementation of `LlmProvider` for local Ollama inference. Ollama honors
//! the response schema through its `format` field but has no web search, so
//! completions never carry grounding chunks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pulse_core::{
    error::{PulseError, Result},
    message::Message,
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, ProviderInfo,
        TokenUsage,
    },
};

use crate::transport_error;

/// Ollama provider configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,

    /// Model used when the request leaves it empty
    pub model: String,

    /// Connection timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
            model: "llama3.2".into(),
            timeout_secs: 120,
        }
    }
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost".into());
        let port = std::env::var("OLLAMA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(11434);
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".into());
        let timeout_secs = std::env::var("OLLAMA_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(120);

        Self {
            host,
            port,
            model,
            timeout_secs,
        }
    }

    fn base_url(&self) -> String {
        format!("{}:{}", self.host.trim_end_matches('/'), self.port)
    }
}

/// Ollama LLM provider
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
    options: ChatOptions,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    message: ChatMessage,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl OllamaProvider {
    /// Create from configuration
    pub fn from_config(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PulseError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(OllamaConfig::from_env())
    }

    /// Create with default localhost settings
    pub fn localhost() -> Result<Self> {
        Self::from_config(OllamaConfig::default())
    }

    /// Convert messages to Ollama format
    fn convert_messages(messages: &[Message], options: &GenerationOptions) -> Vec<ChatMessage> {
        options
            .system_prompt
            .iter()
            .map(|p| ChatMessage {
                role: "system".into(),
                content: p.clone(),
            })
            .chain(messages.iter().map(|m| ChatMessage {
                role: m.role.as_str().into(),
                content: m.content.clone(),
            }))
            .collect()
    }

    fn build_request(&self, messages: &[Message], options: &GenerationOptions) -> ChatRequest {
        if options.web_search {
            tracing::debug!("Ollama has no web search; ignoring web_search option");
        }

        ChatRequest {
            model: if options.model.is_empty() {
                self.config.model.clone()
            } else {
                options.model.clone()
            },
            messages: Self::convert_messages(messages, options),
            stream: false,
            format: options.response_schema.clone(),
            options: ChatOptions {
                temperature: options.temperature,
                top_p: options.top_p,
                num_predict: options.max_tokens,
                stop: options.stop_sequences.clone(),
            },
        }
    }

    /// Convert Ollama response to a completion
    fn convert_completion(response: ChatResponse, model: &str) -> Completion {
        let prompt_tokens = response.prompt_eval_count.unwrap_or(0);
        let completion_tokens = response.eval_count.unwrap_or(0);
        let truncated = response.done_reason.as_deref() == Some("length");

        Completion {
            content: response.message.content,
            model: response.model.unwrap_or_else(|| model.to_string()),
            usage: Some(TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
            truncated,
            finish_reason: Some(if truncated { FinishReason::Length } else { FinishReason::Stop }),
            grounding: Vec::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        let models = self.list_models().await.unwrap_or_default();

        Ok(ProviderInfo {
            name: "Ollama".into(),
            default_model: self.config.model.clone(),
            models,
            supports_web_search: false,
            supports_structured_output: true,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = self.build_request(messages, options);
        let model = request.model.clone();

        let response = self
            .client
            .post(format!("{}/api/chat", self.config.base_url()))
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(&e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(if status.is_server_error() {
                PulseError::ProviderUnavailable(message)
            } else {
                PulseError::Provider(message)
            });
        }

        let response: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| PulseError::InvalidResponse(format!("undecodable Ollama response: {e}")))?;

        Ok(Self::convert_completion(response, &model))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let tags: TagsResponse = self
            .client
            .get(format!("{}/api/tags", self.config.base_url()))
            .send()
            .await
            .map_err(|e| transport_error(&e))?
            .error_for_status()
            .map_err(|e| PulseError::ProviderUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| transport_error(&e))?;

        Ok(tags
            .models
            .into_iter()
            .map(|m| ModelInfo {
                id: m.name.clone(),
                name: m.name,
                context_length: None, // Not exposed by /api/tags
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.host, "http://localhost");
        assert_eq!(config.port, 11434);
        assert_eq!(config.base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_message_conversion() {
        let options = GenerationOptions {
            system_prompt: Some("Respond in JSON.".into()),
            ..Default::default()
        };
        let messages = vec![Message::user("Analyze DOGE")];

        let converted = OllamaProvider::convert_messages(&messages, &options);
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[1].role, "user");
    }

    #[test]
    fn test_request_carries_schema_as_format() {
        let provider = OllamaProvider::localhost().unwrap();
        let options = GenerationOptions {
            response_schema: Some(json!({ "type": "object" })),
            web_search: true,
            ..Default::default()
        };

        let request =
            serde_json::to_value(provider.build_request(&[Message::user("x")], &options)).unwrap();
        assert_eq!(request["model"], "llama3.2");
        assert_eq!(request["stream"], false);
        assert_eq!(request["format"]["type"], "object");
        assert_eq!(request["options"]["num_predict"], 8192);
    }

    #[test]
    fn test_completion_conversion() {
        let response: ChatResponse = serde_json::from_value(json!({
            "model": "llama3.2",
            "message": { "role": "assistant", "content": "{}" },
            "done_reason": "length",
            "prompt_eval_count": 12,
            "eval_count": 30
        }))
        .unwrap();

        let completion = OllamaProvider::convert_completion(response, "fallback");
        assert!(completion.truncated);
        assert!(completion.grounding.is_empty());
        assert_eq!(completion.usage.unwrap().total_tokens, 42);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let provider = OllamaProvider::from_config(OllamaConfig {
            host: "http://127.0.0.1".into(),
            port: 1,
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        assert!(!provider.health_check().await.unwrap());
    }
}
