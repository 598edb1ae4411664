//! Domain Models
//!
//! The analysis a model returns for one trading pair, plus the synthetic
//! chart series shown next to it. Field names serialize in camelCase, the
//! same shape the response schema asks the model for.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Advisory label returned by the model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl Signal {
    pub const ALL: [Self; 5] = [
        Self::StrongBuy,
        Self::Buy,
        Self::Neutral,
        Self::Sell,
        Self::StrongSell,
    ];

    /// Wire label, e.g. `STRONG BUY`
    pub const fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Neutral => "NEUTRAL",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG SELL",
        }
    }

    /// Parse a label, ignoring case, surrounding whitespace and `_`/`-`
    /// separators. Returns `None` for anything outside the five labels.
    pub fn parse_label(label: &str) -> Option<Self> {
        let normalized = label
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();

        Self::ALL.into_iter().find(|s| s.label() == normalized)
    }

    /// Like [`Signal::parse_label`], but an unknown label becomes `Neutral`
    pub fn from_label_lossy(label: &str) -> Self {
        Self::parse_label(label).unwrap_or_else(|| {
            tracing::warn!(label, "Unrecognized signal label, treating as NEUTRAL");
            Self::Neutral
        })
    }

    pub const fn is_bullish(self) -> bool {
        matches!(self, Self::StrongBuy | Self::Buy)
    }

    pub const fn is_bearish(self) -> bool {
        matches!(self, Self::Sell | Self::StrongSell)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Signal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label_lossy(&label))
    }
}

/// Free-text indicator readings; any of them may be missing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalIndicators {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moving_averages: Option<String>,
}

/// A web page cited by the model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Market read for one trading pair
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Pair as echoed by the model (e.g., "BTC/USDT")
    pub symbol: String,

    /// 0 (very bearish) to 100 (very bullish); not clamped
    pub sentiment_score: f64,

    pub signal: Signal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_target: Option<String>,

    pub reasoning: String,

    #[serde(default)]
    pub technical_indicators: TechnicalIndicators,

    /// Hype/community read, mostly for meme coins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meme_factor: Option<String>,

    /// Citations from search grounding, in the order the provider gave them
    #[serde(default)]
    pub sources: Vec<Source>,

    /// When the response was captured
    pub timestamp: DateTime<Utc>,
}

/// One point of the synthetic price chart
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Hour label, e.g. "12:00"
    pub time: String,
    pub price: Decimal,
    pub volume: u32,
}

/// Everything the dashboard needs for one completed search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(default)]
    pub request_id: String,
    pub analysis: AnalysisResult,
    pub chart: Vec<ChartPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_signal_labels_roundtrip() {
        for signal in Signal::ALL {
            assert_eq!(Signal::parse_label(signal.label()), Some(signal));
        }
    }

    #[test]
    fn test_signal_parse_is_lenient() {
        assert_eq!(Signal::parse_label("strong buy"), Some(Signal::StrongBuy));
        assert_eq!(Signal::parse_label("  STRONG_SELL "), Some(Signal::StrongSell));
        assert_eq!(Signal::parse_label("Strong-Buy"), Some(Signal::StrongBuy));
        assert_eq!(Signal::parse_label("HOLD"), None);
        assert_eq!(Signal::from_label_lossy("HOLD"), Signal::Neutral);
    }

    #[test]
    fn test_signal_direction() {
        assert!(Signal::StrongBuy.is_bullish());
        assert!(Signal::StrongSell.is_bearish());
        assert!(!Signal::Neutral.is_bullish() && !Signal::Neutral.is_bearish());
    }

    #[test]
    fn test_analysis_result_camel_case() {
        let value = json!({
            "symbol": "PEPE/USDT",
            "sentimentScore": 81,
            "signal": "BUY",
            "reasoning": "Volume spike on social momentum.",
            "memeFactor": "Very high",
            "timestamp": "2026-01-01T00:00:00Z"
        });

        let result: AnalysisResult = serde_json::from_value(value).unwrap();
        assert_eq!(result.signal, Signal::Buy);
        assert!((result.sentiment_score - 81.0).abs() < f64::EPSILON);
        assert_eq!(result.technical_indicators, TechnicalIndicators::default());
        assert!(result.sources.is_empty());
        assert!(result.price_target.is_none());

        let back = serde_json::to_value(&result).unwrap();
        assert_eq!(back["sentimentScore"], 81.0);
        assert_eq!(back["memeFactor"], "Very high");
        assert!(back.get("priceTarget").is_none());
    }

    #[test]
    fn test_chart_point_price_as_string() {
        let point = ChartPoint {
            time: "12:00".into(),
            price: dec!(50123.45),
            volume: 10,
        };
        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(value["price"], "50123.45");

        let back: ChartPoint = serde_json::from_value(value).unwrap();
        assert_eq!(back, point);
    }
}
