//! Mock Analyzer
//!
//! For demos and tests. Returns a canned read per base asset without any
//! network access.

use async_trait::async_trait;
use chrono::Utc;

use super::MarketAnalyzer;
use crate::error::{AnalyzerError, Result};
use crate::model::{AnalysisResult, Signal, Source, TechnicalIndicators};

/// Mock analyzer with static answers
#[derive(Debug, Default)]
pub struct MockAnalyzer;

impl MockAnalyzer {
    pub const fn new() -> Self {
        Self
    }

    /// Canned (sentiment, signal, rsi, meme factor) for a base asset
    fn canned(base: &str) -> (f64, Signal, &'static str, Option<&'static str>) {
        match base {
            "BTC" => (72.0, Signal::Buy, "58.2", None),
            "ETH" => (64.0, Signal::Buy, "55.9", None),
            "SOL" => (81.0, Signal::StrongBuy, "68.4", Some("Strong developer and memecoin activity")),
            "PEPE" => (77.0, Signal::StrongBuy, "71.3", Some("Trending on social feeds, high whale churn")),
            "DOGE" => (48.0, Signal::Neutral, "49.7", Some("Hype cooling after recent rally")),
            "SHIB" => (31.0, Signal::Sell, "38.1", Some("Community engagement declining")),
            "LUNA" => (12.0, Signal::StrongSell, "22.5", None),
            _ => (50.0, Signal::Neutral, "50.0", None),
        }
    }
}

/// Base asset of a pair: `pepe/usdt` → `PEPE`
fn base_asset(symbol: &str) -> String {
    symbol
        .split(['/', '-', '_'])
        .next()
        .unwrap_or(symbol)
        .trim()
        .to_uppercase()
}

#[async_trait]
impl MarketAnalyzer for MockAnalyzer {
    async fn analyze(&self, symbol: &str) -> Result<AnalysisResult> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(AnalyzerError::EmptySymbol);
        }

        let base = base_asset(symbol);
        let (sentiment_score, signal, rsi, meme_factor) = Self::canned(&base);

        Ok(AnalysisResult {
            symbol: symbol.to_uppercase(),
            sentiment_score,
            signal,
            price_target: None,
            reasoning: format!(
                "Mock analysis for {base}: sentiment {sentiment_score:.0}/100 suggests {signal}. \
                 No live data was consulted."
            ),
            technical_indicators: TechnicalIndicators {
                rsi: Some(rsi.into()),
                macd: None,
                moving_averages: None,
            },
            meme_factor: meme_factor.map(Into::into),
            sources: vec![Source {
                title: "CryptoPulse mock feed".into(),
                uri: format!("https://example.com/mock/{}", base.to_lowercase()),
            }],
            timestamp: Utc::now(),
        })
    }

    async fn health_check(&self) -> bool {
        true // Mock always healthy
    }

    fn name(&self) -> &str {
        "mock"
    }
}
