use derive_more::Display;
use serde::{Deserialize, Serialize};

const DATA_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Largest picture file accepted for upload. Its base64 form stays under the
/// backend's default request limit.
pub const MAX_UPLOAD_BYTES: u64 = 14 * 1024 * 1024;

pub fn exceeds_upload_limit(file_size: u64) -> bool {
    file_size > MAX_UPLOAD_BYTES
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("not a data URL")]
    NotDataUrl,
    #[error("data URL is not base64 encoded")]
    NotBase64,
    #[error("unsupported media type: {0}")]
    NotAnImage(String),
    #[error("image payload is empty")]
    EmptyPayload,
}

/// A captured or uploaded picture in self-describing `data:` URL form.
///
/// Camera captures and file uploads both end up here so everything downstream
/// handles a single representation.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[display(fmt = "{}", _0)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn parse(data_url: impl Into<String>) -> Result<Self, ImageError> {
        let data_url = data_url.into();
        let rest = data_url
            .strip_prefix(DATA_SCHEME)
            .ok_or(ImageError::NotDataUrl)?;
        let (mime, payload) = rest.split_once(BASE64_MARKER).ok_or(ImageError::NotBase64)?;

        if !mime.starts_with("image/") {
            return Err(ImageError::NotAnImage(mime.to_string()));
        }
        if payload.trim().is_empty() {
            return Err(ImageError::EmptyPayload);
        }

        Ok(Self(data_url))
    }

    pub fn mime_type(&self) -> &str {
        self.split().0
    }

    /// Base64 payload with the `data:<mime>;base64,` prefix stripped.
    pub fn payload(&self) -> &str {
        self.split().1
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(&self) -> (&str, &str) {
        // Validated in `parse`, both parts are always present.
        self.0[DATA_SCHEME.len()..]
            .split_once(BASE64_MARKER)
            .unwrap_or(("", ""))
    }
}

impl TryFrom<String> for EncodedImage {
    type Error = ImageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EncodedImage> for String {
    fn from(image: EncodedImage) -> Self {
        image.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_limit_allows_typical_phone_photos() {
        assert!(!exceeds_upload_limit(8 * 1024 * 1024));
        assert!(!exceeds_upload_limit(MAX_UPLOAD_BYTES));
        assert!(exceeds_upload_limit(MAX_UPLOAD_BYTES + 1));
    }

    #[test]
    fn parses_jpeg_data_url() {
        let image = EncodedImage::parse("data:image/jpeg;base64,/9j/4AAQ").unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.payload(), "/9j/4AAQ");
        assert_eq!(image.to_string(), "data:image/jpeg;base64,/9j/4AAQ");
    }

    #[test]
    fn rejects_non_image_media_type() {
        let err = EncodedImage::parse("data:application/pdf;base64,JVBERi0x").unwrap_err();
        assert_eq!(err, ImageError::NotAnImage("application/pdf".into()));
    }

    #[test]
    fn rejects_plain_strings_and_missing_payload() {
        assert_eq!(EncodedImage::parse("/9j/4AAQ"), Err(ImageError::NotDataUrl));
        assert_eq!(
            EncodedImage::parse("data:image/png,rawbytes"),
            Err(ImageError::NotBase64)
        );
        assert_eq!(
            EncodedImage::parse("data:image/png;base64,"),
            Err(ImageError::EmptyPayload)
        );
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<EncodedImage, _> =
            serde_json::from_str("\"data:image/webp;base64,UklGRg==\"");
        assert!(ok.is_ok());

        let bad: Result<EncodedImage, _> = serde_json::from_str("\"data:text/plain;base64,aGk=\"");
        assert!(bad.is_err());
    }
}
