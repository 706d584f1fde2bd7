use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use url::Url;

use super::schema::skin_analysis_schema;
use super::{AnalysisError, InlineImage, VisionModel};

/// Gemini `generateContent` over REST with a JSON response schema.
pub struct GeminiClient {
    endpoint: Url,
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        let model = model.into();
        let endpoint = endpoint_url(base_url, &model)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::Connection(e.to_string()))?;

        Ok(Self {
            endpoint,
            api_key: api_key.into(),
            model,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_request_body(&self, image: &InlineImage, instruction: &str) -> Value {
        json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": image.mime_type, "data": image.base64() } },
                    { "text": instruction }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": skin_analysis_schema()
            }
        })
    }
}

fn endpoint_url(base_url: &str, model: &str) -> Result<Url, AnalysisError> {
    let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
        .map_err(|e| AnalysisError::Connection(format!("invalid base URL {}: {}", base_url, e)))?;
    base.join(&format!("v1beta/models/{}:generateContent", model))
        .map_err(|e| AnalysisError::Connection(format!("invalid model name {}: {}", model, e)))
}

/// Concatenated text parts of the first candidate, if any.
fn extract_text(response: &Value) -> Option<String> {
    let parts = response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() { None } else { Some(text) }
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn generate(
        &self,
        image: &InlineImage,
        instruction: &str,
    ) -> Result<Option<String>, AnalysisError> {
        let body = self.build_request_body(image, instruction);

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".into());

            return Err(match status.as_u16() {
                401 | 403 => AnalysisError::Auth(error_body),
                429 => AnalysisError::Quota(error_body),
                code => AnalysisError::Http {
                    status: code,
                    body: error_body,
                },
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

        if let Some(reason) = payload
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(Value::as_str)
        {
            log::warn!("{} blocked the request: {}", self.model, reason);
        }

        Ok(extract_text(&payload))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
