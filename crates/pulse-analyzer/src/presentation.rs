//! Presentation mapping
//!
//! Pure functions from analysis fields to the CSS classes and strings the
//! frontend renders. Signals map exhaustively; no substring matching.

use rust_decimal::prelude::ToPrimitive;

use crate::model::{ChartPoint, Signal};

/// Placeholder for optional text the model left out
pub const NOT_AVAILABLE: &str = "N/A";

/// Badge classes for a signal
pub const fn signal_badge_class(signal: Signal) -> &'static str {
    match signal {
        Signal::StrongBuy => "text-green-400 bg-green-400/10 border-green-400/50",
        Signal::Buy => "text-green-500 bg-green-500/10 border-green-500/50",
        Signal::Sell | Signal::StrongSell => "text-red-500 bg-red-500/10 border-red-500/50",
        Signal::Neutral => "text-yellow-500 bg-yellow-500/10 border-yellow-500/50",
    }
}

/// Stroke/fill colour of the price chart
pub const fn chart_color(signal: Signal) -> &'static str {
    match signal {
        Signal::StrongBuy | Signal::Buy => "#22c55e",
        Signal::Sell | Signal::StrongSell => "#ef4444",
        Signal::Neutral => "#6366f1",
    }
}

/// Text colour of the sentiment figure
pub fn sentiment_class(score: f64) -> &'static str {
    if score > 50.0 { "text-green-400" } else { "text-red-400" }
}

/// `72/100`, or `72.5/100` for fractional scores
pub fn format_sentiment(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}/100")
    } else {
        format!("{score:.1}/100")
    }
}

/// Optional text, or `N/A`
pub fn or_not_available(value: Option<&str>) -> &str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

/// SVG polyline coordinates for a price series inside a `width` x `height`
/// box. Prices are scaled to the series' own range; a flat series sits on
/// the vertical midline.
pub fn chart_polyline(points: &[ChartPoint], width: f64, height: f64) -> String {
    let prices: Vec<f64> = points
        .iter()
        .map(|p| p.price.to_f64().unwrap_or(0.0))
        .collect();

    let (min, max) = prices
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    let range = max - min;
    #[allow(clippy::cast_precision_loss)]
    let step = if prices.len() > 1 { width / (prices.len() - 1) as f64 } else { 0.0 };

    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| {
            let y = if range > 0.0 {
                height - (price - min) / range * height
            } else {
                height / 2.0
            };
            #[allow(clippy::cast_precision_loss)]
            let x = i as f64 * step;
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn point(hour: usize, price: rust_decimal::Decimal) -> ChartPoint {
        ChartPoint {
            time: format!("{hour}:00"),
            price,
            volume: 0,
        }
    }

    #[test]
    fn test_strong_buy_is_not_plain_buy() {
        let strong = Signal::parse_label("STRONG BUY").unwrap();
        assert_eq!(signal_badge_class(strong), "text-green-400 bg-green-400/10 border-green-400/50");
        assert_ne!(signal_badge_class(strong), signal_badge_class(Signal::Buy));
    }

    #[test]
    fn test_sell_and_neutral_styles() {
        let sell = Signal::parse_label("SELL").unwrap();
        assert!(signal_badge_class(sell).starts_with("text-red-500"));
        assert_eq!(signal_badge_class(Signal::StrongSell), signal_badge_class(sell));

        let neutral = Signal::parse_label("NEUTRAL").unwrap();
        assert!(signal_badge_class(neutral).starts_with("text-yellow-500"));
    }

    #[test]
    fn test_chart_colors() {
        assert_eq!(chart_color(Signal::StrongBuy), "#22c55e");
        assert_eq!(chart_color(Signal::StrongSell), "#ef4444");
        assert_eq!(chart_color(Signal::Neutral), "#6366f1");
    }

    #[test]
    fn test_sentiment_formatting() {
        assert_eq!(sentiment_class(51.0), "text-green-400");
        assert_eq!(sentiment_class(50.0), "text-red-400");
        assert_eq!(format_sentiment(72.0), "72/100");
        assert_eq!(format_sentiment(72.5), "72.5/100");
    }

    #[test]
    fn test_not_available() {
        assert_eq!(or_not_available(None), "N/A");
        assert_eq!(or_not_available(Some(" ")), "N/A");
        assert_eq!(or_not_available(Some("$0.000012")), "$0.000012");
    }

    #[test]
    fn test_chart_polyline_scales_to_box() {
        let points = [point(12, dec!(100)), point(13, dec!(150)), point(14, dec!(200))];
        assert_eq!(
            chart_polyline(&points, 200.0, 100.0),
            "0.0,100.0 100.0,50.0 200.0,0.0"
        );
    }

    #[test]
    fn test_chart_polyline_flat_and_empty() {
        let flat = [point(12, dec!(0)), point(13, dec!(0))];
        assert_eq!(chart_polyline(&flat, 10.0, 40.0), "0.0,20.0 10.0,20.0");
        assert_eq!(chart_polyline(&[], 10.0, 40.0), "");
    }
}
