//! API Client

use pulse_analyzer::{AnalysisReport, error::FALLBACK_MESSAGE};

/// Absolute URL on the serving origin (reqwest needs one on wasm)
fn endpoint(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());
    format!("{origin}{path}")
}

/// Ask the backend to analyze `symbol`
pub async fn analyze(symbol: &str) -> Result<AnalysisReport, String> {
    let client = reqwest::Client::new();

    let response = client
        .post(endpoint("/api/analyze"))
        .json(&serde_json::json!({ "symbol": symbol }))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response
            .json::<AnalysisReport>()
            .await
            .map_err(|_| "Invalid response format from AI".to_string())
    } else {
        let data: serde_json::Value = response.json().await.unwrap_or_default();
        Err(data["error"].as_str().unwrap_or(FALLBACK_MESSAGE).to_string())
    }
}
