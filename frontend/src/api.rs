use gloo_net::http::Request;
use shared::{AnalyzeRequest, EncodedImage, ErrorResponse, SkinAnalysis};

const ANALYZE_ENDPOINT: &str = "/api/analyze";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("Invalid analysis: {0}")]
    Invalid(String),
}

/// Sends one picture for analysis. The caller decides what to do on failure,
/// nothing is retried here.
pub async fn request_analysis(image: &EncodedImage) -> Result<SkinAnalysis, ApiError> {
    let body = AnalyzeRequest {
        image: image.to_string(),
    };

    let response = Request::post(ANALYZE_ENDPOINT)
        .json(&body)
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.error)
            .unwrap_or(text);
        return Err(ApiError::Server { status, message });
    }

    SkinAnalysis::from_json(&text).map_err(|e| ApiError::Invalid(e.to_string()))
}
