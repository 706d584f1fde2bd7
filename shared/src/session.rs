//! Capture/analysis session state machine.
//!
//! The state enum carries its own data so a phase can never be observed
//! without the values it implies: `Completed` always has an image and a
//! result, `Error` always has a message, `Idle` has nothing.

use derive_more::Display;
use strum_macros::{Display as PhaseDisplay, EnumIter};
use uuid::Uuid;

use crate::analysis::{ANALYSIS_FAILED_MESSAGE, SkinAnalysis};
use crate::image::EncodedImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PhaseDisplay, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SessionPhase {
    Idle,
    Capturing,
    Analyzing,
    Completed,
    Error,
}

/// Identifies one outstanding analysis call. Responses carrying an older
/// token are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{}", _0)]
pub struct RequestToken(Uuid);

impl RequestToken {
    fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Capturing,
    Analyzing {
        image: EncodedImage,
        token: RequestToken,
    },
    Completed {
        image: EncodedImage,
        result: SkinAnalysis,
    },
    Error {
        message: String,
    },
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Capturing => SessionPhase::Capturing,
            SessionState::Analyzing { .. } => SessionPhase::Analyzing,
            SessionState::Completed { .. } => SessionPhase::Completed,
            SessionState::Error { .. } => SessionPhase::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot {action} while {phase}")]
    NotAllowed {
        action: &'static str,
        phase: SessionPhase,
    },
}

/// Whether a late analysis outcome was applied or discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn image(&self) -> Option<&EncodedImage> {
        match &self.state {
            SessionState::Analyzing { image, .. } | SessionState::Completed { image, .. } => {
                Some(image)
            }
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&SkinAnalysis> {
        match &self.state {
            SessionState::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn start_capture(&mut self) -> Result<(), TransitionError> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Capturing;
                Ok(())
            }
            _ => Err(self.not_allowed("start capture")),
        }
    }

    pub fn cancel_capture(&mut self) -> Result<(), TransitionError> {
        match self.state {
            SessionState::Capturing => {
                self.state = SessionState::Idle;
                Ok(())
            }
            _ => Err(self.not_allowed("cancel capture")),
        }
    }

    /// Stores `image` and enters `Analyzing`. Only one analysis may be in
    /// flight, so this is rejected unless the session is `Idle` (file pick)
    /// or `Capturing` (frame captured).
    pub fn begin_analysis(&mut self, image: EncodedImage) -> Result<RequestToken, TransitionError> {
        match self.state {
            SessionState::Idle | SessionState::Capturing => {
                let token = RequestToken::mint();
                self.state = SessionState::Analyzing { image, token };
                Ok(token)
            }
            _ => Err(self.not_allowed("begin analysis")),
        }
    }

    pub fn complete(&mut self, token: RequestToken, result: SkinAnalysis) -> Outcome {
        if !self.is_current(token) {
            return Outcome::Stale;
        }
        let previous = std::mem::replace(&mut self.state, SessionState::Idle);
        if let SessionState::Analyzing { image, .. } = previous {
            self.state = SessionState::Completed { image, result };
        }
        Outcome::Applied
    }

    pub fn fail(&mut self, token: RequestToken, message: impl Into<String>) -> Outcome {
        if !self.is_current(token) {
            return Outcome::Stale;
        }
        let message = message.into();
        let message = if message.trim().is_empty() {
            ANALYSIS_FAILED_MESSAGE.to_string()
        } else {
            message
        };
        self.state = SessionState::Error { message };
        Outcome::Applied
    }

    /// Back to `Idle` from any phase, discarding image, result and error.
    /// An analysis still in flight becomes stale.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }

    fn is_current(&self, token: RequestToken) -> bool {
        matches!(&self.state, SessionState::Analyzing { token: current, .. } if *current == token)
    }

    fn not_allowed(&self, action: &'static str) -> TransitionError {
        TransitionError::NotAllowed {
            action,
            phase: self.phase(),
        }
    }
}
