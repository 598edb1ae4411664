//! Gemini LLM Provider
//!
//! Implementation of `LlmProvider` for the Gemini `generateContent` REST API,
//! with Google Search grounding and schema-constrained JSON output.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pulse_core::{
    error::{PulseError, Result},
    message::{Message, Role},
    provider::{
        Completion, FinishReason, GenerationOptions, GroundingChunk, LlmProvider, ModelInfo,
        ProviderInfo, TokenUsage,
    },
};

use crate::transport_error;

/// Gemini provider configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`. Not validated locally.
    pub api_key: String,

    /// Model used when the request leaves it empty
    pub model: String,

    /// API root, e.g. `https://generativelanguage.googleapis.com/v1beta`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-3-flash-preview".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            timeout_secs: 120,
        }
    }
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .unwrap_or_default();
        let model = std::env::var("GEMINI_MODEL").unwrap_or(defaults.model);
        let base_url = std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url);
        let timeout_secs = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        }
    }
}

/// Gemini LLM provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create from configuration
    pub fn from_config(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PulseError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(GeminiConfig::from_env())
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn resolve_model<'a>(&'a self, options: &'a GenerationOptions) -> &'a str {
        if options.model.is_empty() {
            &self.config.model
        } else {
            &options.model
        }
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url, model)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolSpec>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolSpec {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<RemoteModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteModel {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    input_token_limit: Option<u32>,
}

// ============================================================================
// Conversions
// ============================================================================

/// Convert a JSON Schema (lowercase type names) into Gemini's schema dialect,
/// which spells types in upper case (`OBJECT`, `STRING`, ...).
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let converted = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_uppercase()),
                        // property names are user data, only their schemas convert
                        ("properties", Value::Object(props)) => Value::Object(
                            props
                                .iter()
                                .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                                .collect(),
                        ),
                        _ => to_gemini_schema(value),
                    };
                    (key.clone(), converted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

fn build_request(messages: &[Message], options: &GenerationOptions) -> GenerateContentRequest {
    let mut system_parts: Vec<Part> = options
        .system_prompt
        .iter()
        .map(|p| Part::text(p.clone()))
        .collect();
    let mut contents = Vec::new();

    for message in messages {
        if message.is_system() {
            system_parts.push(Part::text(message.content.clone()));
            continue;
        }

        let role = if message.role == Role::Assistant { "model" } else { message.role.as_str() };
        contents.push(Content {
            role: Some(role.into()),
            parts: vec![Part::text(message.content.clone())],
        });
    }

    let system_instruction = (!system_parts.is_empty()).then(|| Content {
        role: None,
        parts: system_parts,
    });

    let tools = if options.web_search {
        vec![ToolSpec {
            google_search: GoogleSearch {},
        }]
    } else {
        Vec::new()
    };

    GenerateContentRequest {
        contents,
        system_instruction,
        tools,
        generation_config: GenerationConfig {
            temperature: options.temperature,
            top_p: options.top_p,
            max_output_tokens: options.max_tokens,
            stop_sequences: options.stop_sequences.clone(),
            response_mime_type: options
                .response_schema
                .as_ref()
                .map(|_| "application/json"),
            response_schema: options.response_schema.as_ref().map(to_gemini_schema),
        },
    }
}

fn convert_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            FinishReason::ContentFilter
        }
        _ => FinishReason::Error,
    }
}

/// Decode a successful `generateContent` body into a completion
fn parse_response(body: &str, model: &str) -> Result<Completion> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| PulseError::InvalidResponse(format!("undecodable Gemini envelope: {e}")))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| PulseError::Provider("Gemini returned no candidates".into()))?;

    let content: String = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter(|p| !p.thought.unwrap_or(false))
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    let finish_reason = candidate.finish_reason.as_deref().map(convert_finish_reason);

    Ok(Completion {
        content,
        model: response.model_version.unwrap_or_else(|| model.to_string()),
        usage: response.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        }),
        truncated: finish_reason == Some(FinishReason::Length),
        finish_reason,
        grounding: candidate
            .grounding_metadata
            .map(|g| g.grounding_chunks)
            .unwrap_or_default(),
    })
}

/// Map a non-success HTTP status onto the provider error space
fn status_error(status: StatusCode, body: &str) -> PulseError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PulseError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => PulseError::RateLimited(message),
        s if s.is_server_error() => PulseError::ProviderUnavailable(message),
        _ => PulseError::Provider(message),
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        let models = self.list_models().await.unwrap_or_default();

        Ok(ProviderInfo {
            name: "Gemini".into(),
            default_model: self.config.model.clone(),
            models,
            supports_web_search: true,
            supports_structured_output: true,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let model = self.resolve_model(options);
        let request = build_request(messages, options);

        tracing::debug!(
            model,
            web_search = options.web_search,
            structured = options.response_schema.is_some(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(self.generate_url(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(&e))?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        parse_response(&body, model)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .client
            .get(format!("{}/models", self.config.base_url))
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(&e))?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let models: ModelsResponse = serde_json::from_str(&body)?;

        Ok(models
            .models
            .into_iter()
            .map(|m| {
                let id = m.name.trim_start_matches("models/").to_string();
                ModelInfo {
                    name: m.display_name.unwrap_or_else(|| id.clone()),
                    id,
                    context_length: m.input_token_limit,
                }
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
        let config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert!(config.base_url.ends_with("/v1beta"));
        assert!(!format!("{config:?}").contains("api_key: \"\""));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeminiConfig {
            api_key: "secret-key".into(),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_schema_types_uppercased() {
        let schema = json!({
            "type": "object",
            "properties": {
                "type": { "type": "string" },
                "nested": {
                    "type": "object",
                    "properties": { "rsi": { "type": "string" } }
                }
            },
            "required": ["type"]
        });

        let converted = to_gemini_schema(&schema);
        assert_eq!(converted["type"], "OBJECT");
        // a property literally called "type" keeps its name
        assert_eq!(converted["properties"]["type"]["type"], "STRING");
        assert_eq!(converted["properties"]["nested"]["properties"]["rsi"]["type"], "STRING");
        assert_eq!(converted["required"], json!(["type"]));
    }

    #[test]
    fn test_build_request_with_search_and_schema() {
        let options = GenerationOptions {
            system_prompt: Some("Be brief.".into()),
            response_schema: Some(json!({ "type": "object" })),
            web_search: true,
            ..Default::default()
        };
        let messages = vec![Message::system("You analyze markets."), Message::user("BTC?")];

        let request = serde_json::to_value(build_request(&messages, &options)).unwrap();

        assert_eq!(request["contents"].as_array().unwrap().len(), 1);
        assert_eq!(request["contents"][0]["role"], "user");
        assert_eq!(request["contents"][0]["parts"][0]["text"], "BTC?");
        assert_eq!(request["systemInstruction"]["parts"].as_array().unwrap().len(), 2);
        assert_eq!(request["tools"], json!([{ "googleSearch": {} }]));
        assert_eq!(request["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(request["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_build_request_plain() {
        let messages = vec![Message::user("hi"), Message::assistant("hello")];
        let request =
            serde_json::to_value(build_request(&messages, &GenerationOptions::default())).unwrap();

        assert!(request.get("tools").is_none());
        assert!(request.get("systemInstruction").is_none());
        assert_eq!(request["contents"][1]["role"], "model");
        assert!(request["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_parse_response_with_grounding() {
        let body = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "thinking...", "thought": true },
                        { "text": "{\"symbol\":" },
                        { "text": "\"BTC\"}" }
                    ]
                },
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://a.example", "title": "A" } },
                        { "retrievedContext": { "uri": "gs://bucket" } }
                    ]
                }
            }],
            "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15 },
            "modelVersion": "gemini-3-flash-preview"
        })
        .to_string();

        let completion = parse_response(&body, "fallback").unwrap();
        assert_eq!(completion.content, "{\"symbol\":\"BTC\"}");
        assert_eq!(completion.model, "gemini-3-flash-preview");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert!(!completion.truncated);
        assert_eq!(completion.grounding.len(), 2);
        assert!(completion.grounding[1].web.is_none());
        assert_eq!(completion.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_parse_response_without_metadata() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{}"}]},"finishReason":"MAX_TOKENS"}]}"#;
        let completion = parse_response(body, "gemini-x").unwrap();
        assert!(completion.grounding.is_empty());
        assert!(completion.truncated);
        assert_eq!(completion.model, "gemini-x");
    }

    #[test]
    fn test_parse_response_no_candidates() {
        let err = parse_response(r#"{"candidates":[]}"#, "m").unwrap_err();
        assert!(matches!(err, PulseError::Provider(_)));

        let err = parse_response("<html>", "m").unwrap_err();
        assert!(matches!(err, PulseError::InvalidResponse(_)));
    }

    #[test]
    fn test_status_error_mapping() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        match status_error(StatusCode::BAD_REQUEST, body) {
            PulseError::Provider(msg) => assert_eq!(msg, "API key not valid."),
            other => panic!("unexpected {other:?}"),
        }

        assert!(matches!(status_error(StatusCode::FORBIDDEN, ""), PulseError::Auth(_)));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            PulseError::RateLimited(_)
        ));
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, "oops"),
            PulseError::ProviderUnavailable(msg) if msg.contains("503")
        ));
    }

    #[test]
    fn test_resolve_model() {
        let provider = GeminiProvider::from_config(GeminiConfig::default()).unwrap();
        let mut options = GenerationOptions::default();
        assert_eq!(provider.resolve_model(&options), "gemini-3-flash-preview");

        options.model = "gemini-2.5-pro".into();
        assert_eq!(provider.resolve_model(&options), "gemini-2.5-pro");
        assert!(provider.generate_url("gemini-2.5-pro").ends_with("/models/gemini-2.5-pro:generateContent"));
    }
}
