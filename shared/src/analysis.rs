use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Analysis failed. Please try again with a clearer picture.";
pub const CAMERA_UNAVAILABLE_MESSAGE: &str = "Unable to access camera. Please check permissions.";

pub const MIN_URGENCY: u8 = 1;
pub const MAX_URGENCY: u8 = 10;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("no analysis payload returned")]
    Empty,
    #[error("payload does not match the analysis schema: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("urgency score {0} is outside 1-10")]
    UrgencyOutOfRange(u8),
}

/// Structured skin assessment returned by the vision model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinAnalysis {
    pub should_get_facial: bool,
    pub urgency_score: u8,
    pub skin_concerns: Vec<String>,
    pub reasoning: String,
    pub recommended_treatment: String,
    pub home_care_tips: Vec<String>,
}

impl SkinAnalysis {
    /// Validated constructor for untrusted payloads. Every field is required,
    /// there are no defaults.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        if text.trim().is_empty() {
            return Err(SchemaError::Empty);
        }
        let analysis: SkinAnalysis = serde_json::from_str(text)?;
        analysis.validate()?;
        Ok(analysis)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if !(MIN_URGENCY..=MAX_URGENCY).contains(&self.urgency_score) {
            return Err(SchemaError::UrgencyOutOfRange(self.urgency_score));
        }
        Ok(())
    }

    pub fn urgency(&self) -> UrgencyLevel {
        UrgencyLevel::from_score(self.urgency_score)
    }

    pub fn headline(&self) -> &'static str {
        if self.should_get_facial {
            "Treatment Recommended"
        } else {
            "Maintenance Mode"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum UrgencyLevel {
    Low,
    Moderate,
    High,
}

impl UrgencyLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            8.. => UrgencyLevel::High,
            5..=7 => UrgencyLevel::Moderate,
            _ => UrgencyLevel::Low,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// `data:` URL of the picture to assess.
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
