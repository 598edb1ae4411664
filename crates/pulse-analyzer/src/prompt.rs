//! Prompt and response schema sent to the model

use serde_json::{Value, json};

/// Fields the model must always return
pub const REQUIRED_FIELDS: [&str; 4] = ["symbol", "sentimentScore", "signal", "reasoning"];

/// Natural-language instruction for one trading pair
pub fn analysis_prompt(symbol: &str) -> String {
    format!(
        "Analyze the cryptocurrency or meme coin pair: {symbol}.
Focus on the current market status (last 24-48 hours), technical indicators (RSI, MACD, Volume), \
and social sentiment (especially for meme coins like PEPE, DOGE, or SOL-based tokens).
Provide a clear \"Signal\" (STRONG BUY, BUY, NEUTRAL, SELL, STRONG SELL).
Include a sentiment score from 0 (very bearish) to 100 (very bullish).
Identify price targets and potential risks.
Use Google Search to get the latest real-time data."
    )
}

/// JSON Schema for the analysis document (lowercase type names; providers
/// convert to their own dialect)
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "symbol": { "type": "string" },
            "sentimentScore": { "type": "number" },
            "signal": {
                "type": "string",
                "description": "Must be one of: STRONG BUY, BUY, NEUTRAL, SELL, STRONG SELL"
            },
            "priceTarget": { "type": "string" },
            "reasoning": { "type": "string" },
            "technicalIndicators": {
                "type": "object",
                "properties": {
                    "rsi": { "type": "string" },
                    "macd": { "type": "string" },
                    "movingAverages": { "type": "string" }
                }
            },
            "memeFactor": {
                "type": "string",
                "description": "Analysis of hype/community for meme coins"
            }
        },
        "required": REQUIRED_FIELDS
    })
}
