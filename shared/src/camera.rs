//! Lifecycle rules for the live camera preview.
//!
//! The browser side owns the actual `MediaStream`; this type decides when a
//! capture is allowed and guarantees the stream's tracks are stopped once.

/// Requested width and height of the square selfie stream.
pub const IDEAL_RESOLUTION: u32 = 1080;
pub const FACING_MODE: &str = "user";
pub const CAPTURE_MIME: &str = "image/jpeg";
pub const JPEG_QUALITY: f64 = 0.85;

/// The preview is shown mirrored and the captured frame is drawn mirrored
/// too, so the stored picture is exactly what the user framed.
pub const MIRROR_CAPTURE: bool = true;

const MIRROR_TRANSFORM: &str = "transform: scaleX(-1);";

/// Inline style for the `<video>` preview so it is flipped the same way the
/// captured frame is.
pub fn preview_style() -> Option<&'static str> {
    MIRROR_CAPTURE.then_some(MIRROR_TRANSFORM)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraStatus {
    Acquiring,
    Attached,
    Ready,
    Unavailable(String),
    Released,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraLifecycle {
    status: CameraStatus,
    holds_stream: bool,
}

impl Default for CameraLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraLifecycle {
    pub fn new() -> Self {
        Self {
            status: CameraStatus::Acquiring,
            holds_stream: false,
        }
    }

    pub fn status(&self) -> &CameraStatus {
        &self.status
    }

    /// A stream was granted. Returns `false` when the provider has already
    /// been released, in which case the caller must stop the stream at once.
    pub fn accept_stream(&mut self) -> bool {
        match self.status {
            CameraStatus::Acquiring => {
                self.status = CameraStatus::Attached;
                self.holds_stream = true;
                true
            }
            _ => false,
        }
    }

    /// Playback started on the attached stream.
    pub fn mark_playing(&mut self) {
        if self.status == CameraStatus::Attached {
            self.status = CameraStatus::Ready;
        }
    }

    /// Permission denied or no device. Terminal until the provider is torn down.
    pub fn mark_unavailable(&mut self, message: impl Into<String>) {
        if matches!(self.status, CameraStatus::Acquiring | CameraStatus::Attached) {
            self.status = CameraStatus::Unavailable(message.into());
        }
    }

    pub fn can_capture(&self) -> bool {
        self.status == CameraStatus::Ready
    }

    pub fn unavailable_message(&self) -> Option<&str> {
        match &self.status {
            CameraStatus::Unavailable(message) => Some(message),
            _ => None,
        }
    }

    /// Moves to `Released`. Returns `true` only on the first call made
    /// while a stream is held, which is when tracks must be stopped.
    pub fn release(&mut self) -> bool {
        self.status = CameraStatus::Released;
        std::mem::take(&mut self.holds_stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_is_flipped_like_the_capture() {
        assert_eq!(preview_style().is_some(), MIRROR_CAPTURE);
        if MIRROR_CAPTURE {
            assert_eq!(preview_style(), Some("transform: scaleX(-1);"));
        }
    }

    #[test]
    fn capture_blocked_until_playing() {
        let mut camera = CameraLifecycle::new();
        assert!(!camera.can_capture());

        assert!(camera.accept_stream());
        assert!(!camera.can_capture());

        camera.mark_playing();
        assert!(camera.can_capture());
    }

    #[test]
    fn playing_without_stream_is_ignored() {
        let mut camera = CameraLifecycle::new();
        camera.mark_playing();
        assert_eq!(camera.status(), &CameraStatus::Acquiring);
        assert!(!camera.can_capture());
    }

    #[test]
    fn release_stops_tracks_exactly_once() {
        let mut camera = CameraLifecycle::new();
        camera.accept_stream();
        camera.mark_playing();

        assert!(camera.release());
        assert!(!camera.release());
        assert!(!camera.can_capture());
    }

    #[test]
    fn two_consecutive_sessions_each_release_once() {
        let mut stops = 0;
        for _ in 0..2 {
            let mut camera = CameraLifecycle::new();
            camera.accept_stream();
            camera.mark_playing();
            // Capture releases immediately, teardown releases again.
            for _ in 0..2 {
                if camera.release() {
                    stops += 1;
                }
            }
        }
        assert_eq!(stops, 2);
    }

    #[test]
    fn stream_arriving_after_release_is_refused() {
        let mut camera = CameraLifecycle::new();
        assert!(!camera.release());
        assert!(!camera.accept_stream());
        assert_eq!(camera.status(), &CameraStatus::Released);
    }

    #[test]
    fn failed_playback_still_releases_the_stream() {
        let mut camera = CameraLifecycle::new();
        camera.accept_stream();
        camera.mark_unavailable("play() rejected");
        assert!(!camera.can_capture());
        assert!(camera.release());
        assert!(!camera.release());
    }

    #[test]
    fn unavailable_is_terminal() {
        let mut camera = CameraLifecycle::new();
        camera.mark_unavailable("Unable to access camera. Please check permissions.");
        assert_eq!(
            camera.unavailable_message(),
            Some("Unable to access camera. Please check permissions.")
        );
        camera.mark_playing();
        assert!(!camera.can_capture());
        assert!(!camera.accept_stream());
        assert!(!camera.release());
    }
}
