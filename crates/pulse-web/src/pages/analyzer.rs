//! Analyzer Page

use leptos::prelude::*;
use pulse_analyzer::{Dashboard, View as DashboardView};

use crate::api;
use crate::components::AnalysisPanel;

#[component]
pub fn AnalyzerPage() -> impl IntoView {
    let dashboard = RwSignal::new(Dashboard::default());

    // Start a search; only the latest ticket's outcome lands
    let search = move |symbol: String| {
        let mut issued = None;
        dashboard.update(|d| {
            let (next, ticket) = std::mem::take(d).begin(&symbol);
            *d = next;
            issued = ticket;
        });
        let Some(ticket) = issued else {
            return;
        };

        let symbol = dashboard.with_untracked(|d| d.query().to_string());
        leptos::task::spawn_local(async move {
            let outcome = api::analyze(&symbol).await;
            dashboard.update(|d| *d = std::mem::take(d).resolve(ticket, outcome));
        });
    };

    let submit = move || search(dashboard.with_untracked(|d| d.query().to_string()));
    let loading = move || dashboard.with(Dashboard::is_loading);

    view! {
        <div class="analyzer">
            <nav class="navbar">
                <h1 class="brand">"CryptoPulse AI"</h1>
            </nav>

            <header class="hero">
                <h2>"Analyze Any Crypto Pair"</h2>
                <p class="tagline">
                    "Technical analysis and social sentiment for major coins and trending meme tokens."
                </p>
            </header>

            <div class="search">
                <input
                    type="text"
                    placeholder="e.g. BTC/USDT, PEPE, SOL"
                    prop:value=move || dashboard.with(|d| d.query().to_string())
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        dashboard.update(|d| *d = std::mem::take(d).with_query(text));
                    }
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            submit();
                        }
                    }
                />
                <button on:click=move |_| submit() disabled=loading>
                    {move || if loading() { "..." } else { "Analyze" }}
                </button>
            </div>

            <div class="history">
                <For
                    each=move || dashboard.with(|d| d.history().as_slice().to_vec())
                    key=|symbol| symbol.clone()
                    children=move |symbol| {
                        let label = symbol.clone();
                        view! {
                            <button class="chip" on:click=move |_| search(symbol.clone())>
                                {label}
                            </button>
                        }
                    }
                />
            </div>

            {move || {
                dashboard
                    .with(|d| match d.view() {
                        DashboardView::Idle => {
                            view! {
                                <div class="placeholder">
                                    <p>"Waiting for Signal"</p>
                                </div>
                            }
                                .into_any()
                        }
                        DashboardView::Loading { symbol } => {
                            let symbol = symbol.to_string();
                            view! {
                                <div class="loading">
                                    <div class="spinner"></div>
                                    <p>"Scanning blockchain data and social sentiment for " {symbol} "..."</p>
                                </div>
                            }
                                .into_any()
                        }
                        DashboardView::Loaded(report) => {
                            view! { <AnalysisPanel report=report.clone() /> }.into_any()
                        }
                        DashboardView::Failed { message, previous } => {
                            let message = message.to_string();
                            let previous = previous.cloned();
                            view! {
                                <div class="error-banner">
                                    <p>{message}</p>
                                </div>
                                {previous.map(|report| view! { <AnalysisPanel report=report /> })}
                            }
                                .into_any()
                        }
                    })
            }}
        </div>
    }
}
