//! Chart Filler
//!
//! Cosmetic price series for the dashboard. A bounded random walk with a
//! slight upward drift, seeded from the sentiment score.

#[cfg(feature = "runtime")]
use rand::Rng;
#[cfg(feature = "runtime")]
use rust_decimal::Decimal;

#[cfg(feature = "runtime")]
use crate::model::ChartPoint;

/// Number of points in every series
pub const CHART_POINTS: usize = 20;

/// First hour label of the series
pub const FIRST_HOUR: usize = 12;

/// Seed price per sentiment point
pub const PRICE_PER_SENTIMENT_POINT: f64 = 500.0;

/// Maximum step size as a fraction of the current price
#[cfg(feature = "runtime")]
const STEP_FRACTION: f64 = 0.02;

/// Centre of the uniform draw; below 0.5 tilts the walk upwards
#[cfg(feature = "runtime")]
const DRIFT_CENTRE: f64 = 0.48;

/// Seed price for a sentiment score, never negative
pub fn seed_price(sentiment_score: f64) -> f64 {
    (sentiment_score * PRICE_PER_SENTIMENT_POINT).max(0.0)
}

/// Generate a fresh series from `seed` using the thread RNG
#[cfg(feature = "runtime")]
pub fn random_walk(seed: f64) -> Vec<ChartPoint> {
    random_walk_with(&mut rand::thread_rng(), seed)
}

/// Generate a series from `seed` with a caller-supplied RNG
#[cfg(feature = "runtime")]
pub fn random_walk_with<R: Rng + ?Sized>(rng: &mut R, seed: f64) -> Vec<ChartPoint> {
    let mut price = if seed.is_finite() { seed.max(0.0) } else { 0.0 };

    (0..CHART_POINTS)
        .map(|i| {
            let change = (rng.gen_range(0.0..1.0) - DRIFT_CENTRE) * price * STEP_FRACTION;
            price = (price + change).max(0.0);

            ChartPoint {
                time: format!("{}:00", FIRST_HOUR + i),
                price: Decimal::from_f64_retain(price)
                    .unwrap_or(Decimal::ZERO)
                    .round_dp(2),
                volume: rng.gen_range(0..1000),
            }
        })
        .collect()
}
