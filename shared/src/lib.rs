pub mod analysis;
pub mod camera;
pub mod image;
pub mod session;

pub use analysis::{
    ANALYSIS_FAILED_MESSAGE, AnalyzeRequest, CAMERA_UNAVAILABLE_MESSAGE, ErrorResponse,
    SchemaError, SkinAnalysis, UrgencyLevel,
};
pub use camera::{CameraLifecycle, CameraStatus};
pub use image::{EncodedImage, ImageError};
pub use session::{Outcome, RequestToken, Session, SessionPhase, SessionState, TransitionError};
