//! Application State

use std::sync::Arc;

use pulse_analyzer::MarketAnalyzer;
use pulse_core::LlmProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Produces analyses (LLM-backed or mock)
    pub analyzer: Arc<dyn MarketAnalyzer>,

    /// Underlying LLM provider (None in mock mode)
    pub provider: Option<Arc<dyn LlmProvider>>,
}
