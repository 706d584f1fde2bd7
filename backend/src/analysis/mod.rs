use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use shared::{EncodedImage, ImageError, SchemaError, SkinAnalysis};
use std::sync::Arc;

pub mod gemini;
pub mod schema;

pub use gemini::GeminiClient;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Quota exceeded: {0}")]
    Quota(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Model returned no analysis")]
    EmptyResponse,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl From<ImageError> for AnalysisError {
    fn from(err: ImageError) -> Self {
        AnalysisError::InvalidImage(err.to_string())
    }
}

impl AnalysisError {
    /// Failures caused by the submitted picture rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalysisError::InvalidImage(_))
    }
}

/// Image bytes ready to ship to a vision model.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InlineImage {
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

/// External vision service producing structured JSON text for one image.
///
/// `Ok(None)` means the call succeeded but carried no payload.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate(
        &self,
        image: &InlineImage,
        instruction: &str,
    ) -> Result<Option<String>, AnalysisError>;

    fn name(&self) -> &str;
}

#[derive(Clone)]
pub struct AnalysisClient {
    model: Arc<dyn VisionModel>,
    instruction: String,
}

impl AnalysisClient {
    pub fn new(model: Arc<dyn VisionModel>, instruction: impl Into<String>) -> Self {
        Self {
            model,
            instruction: instruction.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// One attempt, no retry: decode, call the model once, validate.
    pub async fn analyze(&self, data_url: &str) -> Result<SkinAnalysis, AnalysisError> {
        let image = decode_image(data_url)?;
        log::debug!(
            "Sending {} byte {} image to {}",
            image.data.len(),
            image.mime_type,
            self.model.name()
        );

        let text = self
            .model
            .generate(&image, &self.instruction)
            .await?
            .ok_or(AnalysisError::EmptyResponse)?;

        Ok(SkinAnalysis::from_json(&text)?)
    }
}

/// Strips the `data:` prefix and checks the bytes really are a picture.
pub fn decode_image(data_url: &str) -> Result<InlineImage, AnalysisError> {
    let encoded = EncodedImage::parse(data_url)?;
    let data = STANDARD
        .decode(encoded.payload().trim())
        .map_err(|e| AnalysisError::InvalidImage(format!("bad base64 payload: {}", e)))?;

    let format = image::guess_format(&data)
        .map_err(|_| AnalysisError::InvalidImage("payload is not a recognised image".into()))?;

    Ok(InlineImage {
        mime_type: format.to_mime_type().to_string(),
        data,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Smallest JPEG header `image::guess_format` recognises.
    pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    pub fn jpeg_data_url() -> String {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(JPEG_BYTES))
    }

    pub const VALID_PAYLOAD: &str = r#"{
        "shouldGetFacial": true,
        "urgencyScore": 7,
        "skinConcerns": ["Clogged pores on the nose", "Uneven tone"],
        "reasoning": "Congestion is visible across the T-zone.",
        "recommendedTreatment": "Deep Cleansing Facial",
        "homeCareTips": ["Exfoliate twice a week", "Wear SPF 30 daily"]
    }"#;

    pub enum Reply {
        Text(&'static str),
        Nothing,
        Fail(fn() -> AnalysisError),
    }

    pub struct FakeModel {
        reply: Reply,
        pub calls: AtomicUsize,
        pub last_mime: Mutex<Option<String>>,
    }

    impl FakeModel {
        pub fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_mime: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl VisionModel for FakeModel {
        async fn generate(
            &self,
            image: &InlineImage,
            _instruction: &str,
        ) -> Result<Option<String>, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_mime.lock().unwrap() = Some(image.mime_type.clone());
            match &self.reply {
                Reply::Text(text) => Ok(Some(text.to_string())),
                Reply::Nothing => Ok(None),
                Reply::Fail(make) => Err(make()),
            }
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    #[actix_web::test]
    async fn returns_result_unmodified() {
        let model = FakeModel::new(Reply::Text(VALID_PAYLOAD));
        let client = AnalysisClient::new(model.clone(), "assess");

        let analysis = client.analyze(&jpeg_data_url()).await.unwrap();
        assert_eq!(analysis.urgency_score, 7);
        assert_eq!(analysis, SkinAnalysis::from_json(VALID_PAYLOAD).unwrap());
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.last_mime.lock().unwrap().as_deref(), Some("image/jpeg"));
    }

    #[actix_web::test]
    async fn empty_payload_is_a_failure() {
        let model = FakeModel::new(Reply::Nothing);
        let client = AnalysisClient::new(model, "assess");
        let err = client.analyze(&jpeg_data_url()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyResponse));

        let model = FakeModel::new(Reply::Text(""));
        let client = AnalysisClient::new(model, "assess");
        let err = client.analyze(&jpeg_data_url()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(SchemaError::Empty)));
    }

    #[actix_web::test]
    async fn service_failure_is_not_retried() {
        let model = FakeModel::new(Reply::Fail(|| AnalysisError::Connection("reset".into())));
        let client = AnalysisClient::new(model.clone(), "assess");
        let err = client.analyze(&jpeg_data_url()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Connection(_)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn partial_payload_is_rejected() {
        let model = FakeModel::new(Reply::Text(r#"{"shouldGetFacial": true, "urgencyScore": 4}"#));
        let client = AnalysisClient::new(model, "assess");
        let err = client.analyze(&jpeg_data_url()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(SchemaError::Malformed(_))));
    }

    #[actix_web::test]
    async fn non_image_never_reaches_the_model() {
        let model = FakeModel::new(Reply::Text(VALID_PAYLOAD));
        let client = AnalysisClient::new(model.clone(), "assess");

        let text_as_image = format!("data:image/png;base64,{}", STANDARD.encode(b"hello world"));
        let err = client.analyze(&text_as_image).await.unwrap_err();
        assert!(err.is_client_error());

        let err = client.analyze("data:text/plain;base64,aGVsbG8=").await.unwrap_err();
        assert!(err.is_client_error());

        let err = client.analyze("data:image/jpeg;base64,%%%").await.unwrap_err();
        assert!(err.is_client_error());

        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn decode_uses_sniffed_mime_type() {
        // Declared as png, bytes are jpeg.
        let url = format!("data:image/png;base64,{}", STANDARD.encode(JPEG_BYTES));
        let image = decode_image(&url).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, JPEG_BYTES);
        assert_eq!(image.base64(), STANDARD.encode(JPEG_BYTES));
    }
}
