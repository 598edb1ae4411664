//! crypto-pulse HTTP Server
//!
//! Axum server exposing the analysis API and serving the WASM frontend.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulse_analyzer::{LlmAnalyzer, MarketAnalyzer, MockAnalyzer};
use pulse_core::LlmProvider;
use pulse_runtime::{GeminiProvider, OllamaProvider};

use crate::config::{ProviderKind, ServerConfig};
use crate::handlers::{analyze_handler, health_check, provider_info};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let state = build_state(config.provider)?;

    if state.analyzer.health_check().await {
        tracing::info!("✓ {} provider reachable", config.provider);
        if let Some(provider) = &state.provider {
            if let Ok(models) = provider.list_models().await {
                tracing::info!("  {} models available", models.len());
            }
        }
    } else {
        tracing::warn!("⚠ {} provider not reachable - analyses will fail", config.provider);
        tracing::warn!("  Check API keys / hosts in .env, or set PULSE_PROVIDER=mock");
    }

    let app = build_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 crypto-pulse server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health       - Health check");
    tracing::info!("  GET  /api/models   - Provider info");
    tracing::info!("  POST /api/analyze  - Analyze a trading pair");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Wire the configured provider into an analyzer
fn build_state(kind: ProviderKind) -> anyhow::Result<AppState> {
    let provider: Option<Arc<dyn LlmProvider>> = match kind {
        ProviderKind::Gemini => Some(Arc::new(GeminiProvider::from_env()?)),
        ProviderKind::Ollama => Some(Arc::new(OllamaProvider::from_env()?)),
        ProviderKind::Mock => None,
    };

    let analyzer: Arc<dyn MarketAnalyzer> = match &provider {
        Some(provider) => Arc::new(LlmAnalyzer::new(Arc::clone(provider))),
        None => Arc::new(MockAnalyzer::new()),
    };

    Ok(AppState { analyzer, provider })
}

pub(crate) fn build_router(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/models", get(provider_info))
        .route("/api/analyze", post(analyze_handler))
        // Static files (WASM frontend)
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
