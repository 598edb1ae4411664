//! Market Analyzers
//!
//! The seam between callers and whatever produces an analysis. The server
//! and tests only see [`MarketAnalyzer`]; [`LlmAnalyzer`] is the real
//! adapter and [`MockAnalyzer`] a canned stand-in.

mod mock;

pub use mock::MockAnalyzer;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use pulse_core::{GenerationOptions, LlmProvider, Message};

use crate::error::{AnalyzerError, Result};
use crate::model::{AnalysisResult, Signal, Source, TechnicalIndicators};
use crate::prompt::{analysis_prompt, response_schema};
use crate::sources::extract_sources;

/// Analyzer trait (Strategy pattern)
///
/// Given a symbol, return an analysis or an error.
#[async_trait]
pub trait MarketAnalyzer: Send + Sync {
    /// Analyze one trading pair
    async fn analyze(&self, symbol: &str) -> Result<AnalysisResult>;

    /// Check if the backing service is reachable
    async fn health_check(&self) -> bool;

    /// Analyzer name
    fn name(&self) -> &str;
}

/// Document the model is asked to produce
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelAnalysis {
    symbol: String,
    sentiment_score: f64,
    signal: Signal,
    #[serde(default)]
    price_target: Option<String>,
    reasoning: String,
    #[serde(default)]
    technical_indicators: Option<TechnicalIndicators>,
    #[serde(default)]
    meme_factor: Option<String>,
}

impl ModelAnalysis {
    fn into_result(self, sources: Vec<Source>, timestamp: DateTime<Utc>) -> AnalysisResult {
        AnalysisResult {
            symbol: self.symbol,
            sentiment_score: self.sentiment_score,
            signal: self.signal,
            price_target: self.price_target,
            reasoning: self.reasoning,
            technical_indicators: self.technical_indicators.unwrap_or_default(),
            meme_factor: self.meme_factor,
            sources,
            timestamp,
        }
    }
}

/// Strip a surrounding markdown code fence, if any
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &inner[4..],
        _ => inner,
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Decode model text into the analysis document
fn decode_analysis(text: &str) -> Result<ModelAnalysis> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        tracing::error!("Model returned an empty response");
        return Err(AnalyzerError::InvalidResponse);
    }

    serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse model JSON output");
        AnalyzerError::InvalidResponse
    })
}

/// Analyzer backed by an LLM provider with search grounding
pub struct LlmAnalyzer {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl LlmAnalyzer {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self::with_options(provider, GenerationOptions::default())
    }

    /// Use custom generation options; schema and web search are always set
    pub fn with_options(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    fn request_options(&self) -> GenerationOptions {
        GenerationOptions {
            response_schema: Some(response_schema()),
            web_search: true,
            ..self.options.clone()
        }
    }
}

#[async_trait]
impl MarketAnalyzer for LlmAnalyzer {
    async fn analyze(&self, symbol: &str) -> Result<AnalysisResult> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(AnalyzerError::EmptySymbol);
        }

        let prompt = analysis_prompt(symbol);
        tracing::info!(
            symbol,
            prompt_tokens = self.provider.estimate_tokens(&prompt),
            "Requesting market analysis"
        );

        let completion = self
            .provider
            .complete(&[Message::user(prompt)], &self.request_options())
            .await?;

        if completion.truncated {
            tracing::warn!(symbol, "Model output was truncated");
        }

        let sources = extract_sources(&completion.grounding);
        let analysis = decode_analysis(&completion.content)?;

        tracing::info!(
            symbol,
            signal = %analysis.signal,
            sources = sources.len(),
            "Analysis received"
        );

        Ok(analysis.into_result(sources, Utc::now()))
    }

    async fn health_check(&self) -> bool {
        self.provider.health_check().await.unwrap_or(false)
    }

    fn name(&self) -> &str {
        "llm"
    }
}
