//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use pulse_analyzer::{AnalysisReport, AnalyzerError, chart};
use pulse_core::{ProviderInfo, PulseError};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub provider_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub symbol: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: String, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error,
            code: code.into(),
        }),
    )
}

/// Status code and error code for a failed analysis
fn classify(err: &AnalyzerError) -> (StatusCode, &'static str) {
    match err {
        AnalyzerError::EmptySymbol => (StatusCode::BAD_REQUEST, "EMPTY_SYMBOL"),
        AnalyzerError::InvalidResponse
        | AnalyzerError::Remote(PulseError::InvalidResponse(_) | PulseError::Json(_)) => {
            (StatusCode::BAD_GATEWAY, "INVALID_RESPONSE")
        }
        AnalyzerError::Remote(remote) => classify_remote(remote),
    }
}

fn classify_remote(err: &PulseError) -> (StatusCode, &'static str) {
    match err {
        PulseError::Auth(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_AUTH"),
        PulseError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        PulseError::ProviderUnavailable(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
        }
        PulseError::InvalidResponse(_) | PulseError::Json(_) => {
            (StatusCode::BAD_GATEWAY, "INVALID_RESPONSE")
        }
        _ => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
    }
}

impl From<&AnalyzerError> for ErrorResponse {
    fn from(err: &AnalyzerError) -> Self {
        Self {
            error: err.user_message(),
            code: classify(err).1.into(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.analyzer.health_check().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.analyzer.name().to_string(),
        provider_connected,
    })
}

/// Metadata of the configured LLM provider
pub async fn provider_info(
    State(state): State<AppState>,
) -> Result<Json<ProviderInfo>, ApiError> {
    let Some(provider) = state.provider else {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "No LLM provider configured (mock mode)".into(),
            "PROVIDER_DISABLED",
        ));
    };

    provider.info().await.map(Json).map_err(|e| {
        tracing::error!("Provider info error: {}", e);
        let err = AnalyzerError::from(e);
        let (status, code) = classify(&err);
        api_error(status, err.user_message(), code)
    })
}

/// Analyze one trading pair and attach a chart series
pub async fn analyze_handler(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("analyze", request_id = %request_id, symbol = %payload.symbol);

    async move {
        let analysis = state.analyzer.analyze(&payload.symbol).await.map_err(|e| {
            tracing::error!("Analysis failed: {}", e);
            let (status, _) = classify(&e);
            (status, Json(ErrorResponse::from(&e)))
        })?;

        tracing::info!(
            signal = %analysis.signal,
            sentiment = analysis.sentiment_score,
            sources = analysis.sources.len(),
            "Analysis complete"
        );

        let chart = chart::random_walk(chart::seed_price(analysis.sentiment_score));

        Ok(Json(AnalysisReport {
            request_id,
            analysis,
            chart,
        }))
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Request, header},
    };
    use pulse_analyzer::{AnalysisResult, MarketAnalyzer, MockAnalyzer, chart::CHART_POINTS};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FailingAnalyzer(fn() -> AnalyzerError);

    #[async_trait]
    impl MarketAnalyzer for FailingAnalyzer {
        async fn analyze(&self, _symbol: &str) -> pulse_analyzer::Result<AnalysisResult> {
            Err((self.0)())
        }

        async fn health_check(&self) -> bool {
            false
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn app(analyzer: Arc<dyn MarketAnalyzer>) -> Router {
        crate::build_router(
            AppState {
                analyzer,
                provider: None,
            },
            "static",
        )
    }

    fn analyze_request(symbol: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "symbol": symbol }).to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(MockAnalyzer::new()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["provider"], "mock");
        assert_eq!(body["providerConnected"], true);
    }

    #[tokio::test]
    async fn test_analyze_returns_report() {
        let response = app(Arc::new(MockAnalyzer::new()))
            .oneshot(analyze_request("sol/usdt"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let report: AnalysisReport = serde_json::from_value(read_json(response).await).unwrap();
        assert_eq!(report.analysis.symbol, "SOL/USDT");
        assert_eq!(report.chart.len(), CHART_POINTS);
        assert_eq!(report.chart[0].time, "12:00");
        assert!(!report.request_id.is_empty());
    }

    #[tokio::test]
    async fn test_blank_symbol_is_bad_request() {
        let response = app(Arc::new(MockAnalyzer::new()))
            .oneshot(analyze_request("   "))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["code"], "EMPTY_SYMBOL");
    }

    #[tokio::test]
    async fn test_invalid_model_output() {
        let analyzer = FailingAnalyzer(|| AnalyzerError::InvalidResponse);
        let response = app(Arc::new(analyzer))
            .oneshot(analyze_request("BTC/USDT"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Invalid response format from AI");
        assert_eq!(body["code"], "INVALID_RESPONSE");
    }

    #[tokio::test]
    async fn test_rate_limit_passes_through() {
        let analyzer =
            FailingAnalyzer(|| PulseError::RateLimited("Resource exhausted".into()).into());
        let response = app(Arc::new(analyzer))
            .oneshot(analyze_request("BTC/USDT"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = read_json(response).await;
        assert_eq!(body["code"], "RATE_LIMITED");
        assert_eq!(body["error"], "Too many requests: Resource exhausted");
    }

    #[tokio::test]
    async fn test_provider_info_disabled_in_mock_mode() {
        let response = app(Arc::new(MockAnalyzer::new()))
            .oneshot(Request::get("/api/models").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(read_json(response).await["code"], "PROVIDER_DISABLED");
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(&PulseError::Auth("API key not valid".into()).into()),
            (StatusCode::BAD_GATEWAY, "PROVIDER_AUTH")
        );
        assert_eq!(
            classify(&PulseError::ProviderUnavailable("timeout".into()).into()),
            (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
        );
        assert_eq!(
            classify(&PulseError::InvalidResponse("bad envelope".into()).into()),
            (StatusCode::BAD_GATEWAY, "INVALID_RESPONSE")
        );
        assert_eq!(
            classify(&PulseError::Provider("quota".into()).into()),
            (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR")
        );
    }
}
