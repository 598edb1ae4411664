//! UI Components

use leptos::prelude::*;
use pulse_analyzer::{
    AnalysisReport, ChartPoint, Signal as TradeSignal, Source,
    presentation::{
        chart_color, chart_polyline, format_sentiment, or_not_available, sentiment_class,
        signal_badge_class,
    },
};

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 240.0;

/// Coloured signal label
#[component]
pub fn SignalBadge(signal: TradeSignal) -> impl IntoView {
    let class = format!("signal-badge {}", signal_badge_class(signal));

    view! { <span class=class>{signal.label()}</span> }
}

/// Illustrative price line; colour follows the signal
#[component]
pub fn PriceChart(points: Vec<ChartPoint>, signal: TradeSignal) -> impl IntoView {
    let color = chart_color(signal);
    let line = chart_polyline(&points, CHART_WIDTH, CHART_HEIGHT);
    let area = format!("0,{CHART_HEIGHT} {line} {CHART_WIDTH},{CHART_HEIGHT}");
    let first = points.first().map(|p| p.time.clone()).unwrap_or_default();
    let last = points.last().map(|p| p.time.clone()).unwrap_or_default();

    view! {
        <div class="price-chart">
            <svg viewBox=format!("0 0 {CHART_WIDTH} {CHART_HEIGHT}") preserveAspectRatio="none">
                <polygon points=area fill=color fill-opacity="0.15" />
                <polyline points=line fill="none" stroke=color stroke-width="2" />
            </svg>
            <div class="chart-axis">
                <span>{first}</span>
                <span>{last}</span>
            </div>
        </div>
    }
}

#[component]
fn Indicator(label: &'static str, value: Option<String>) -> impl IntoView {
    let value = or_not_available(value.as_deref()).to_string();

    view! {
        <div class="indicator">
            <span class="label">{label}</span>
            <span class="value">{value}</span>
        </div>
    }
}

/// Cited pages, or a note when the model cited none
#[component]
pub fn SourcesList(sources: Vec<Source>) -> impl IntoView {
    if sources.is_empty() {
        return view! { <p class="muted">"No direct sources available."</p> }.into_any();
    }

    view! {
        <ul class="sources">
            {sources
                .into_iter()
                .map(|source| {
                    let href = source.uri.clone();
                    view! {
                        <li>
                            <a href=href target="_blank" rel="noopener noreferrer">
                                <span class="source-title">{source.title}</span>
                                <span class="source-uri">{source.uri}</span>
                            </a>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}

#[component]
pub fn Disclaimer() -> impl IntoView {
    view! {
        <aside class="disclaimer">
            <p class="label">"Notice"</p>
            <p>
                "Trading cryptocurrencies involves high risk and may not be suitable for all \
                 investors. This AI-generated analysis is for informational purposes only and \
                 does not constitute financial advice. Always DYOR (Do Your Own Research)."
            </p>
        </aside>
    }
}

/// Full read-out for one completed search
#[component]
pub fn AnalysisPanel(report: AnalysisReport) -> impl IntoView {
    let AnalysisReport {
        analysis, chart, ..
    } = report;

    let updated = analysis
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M:%S")
        .to_string();
    let score_class = format!("sentiment {}", sentiment_class(analysis.sentiment_score));
    let score = format_sentiment(analysis.sentiment_score);
    let target = or_not_available(analysis.price_target.as_deref()).to_string();
    let signal = analysis.signal;
    let indicators = analysis.technical_indicators;

    view! {
        <section class="analysis">
            <div class="analysis-main">
                <header class="analysis-header">
                    <div>
                        <h2>{analysis.symbol}</h2>
                        <span class="muted">"Updated " {updated}</span>
                    </div>
                    <SignalBadge signal=signal />
                </header>

                <div class="stats">
                    <div class="stat">
                        <span class="label">"Sentiment"</span>
                        <span class=score_class>{score}</span>
                    </div>
                    <div class="stat">
                        <span class="label">"Price Target"</span>
                        <span>{target}</span>
                    </div>
                </div>

                <PriceChart points=chart signal=signal />

                <div class="indicators">
                    <Indicator label="RSI" value=indicators.rsi />
                    <Indicator label="MACD" value=indicators.macd />
                    <Indicator label="Moving Averages" value=indicators.moving_averages />
                </div>

                <div class="reasoning">
                    <h3>"AI Reasoning"</h3>
                    <p>{analysis.reasoning}</p>
                </div>
            </div>

            <div class="analysis-side">
                {analysis.meme_factor.map(|meme| {
                    view! {
                        <div class="meme-factor">
                            <h3>"Meme Factor"</h3>
                            <p>{meme}</p>
                        </div>
                    }
                })}

                <div class="sources-card">
                    <h3>"Sources"</h3>
                    <SourcesList sources=analysis.sources />
                </div>

                <Disclaimer />
            </div>
        </section>
    }
}
