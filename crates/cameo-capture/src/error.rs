//! Error types for the capture module.

use thiserror::Error;

/// Errors that can occur during capture operations.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Backend library error.
    #[error("Backend error: {message}")]
    Backend {
        message: String,
        #[cfg(feature = "opencv")]
        #[source]
        source: Option<opencv::Error>,
    },

    /// Capture source not found or could not be opened.
    #[error("Capture source not found: {0}")]
    SourceNotFound(String),

    /// `enter_frame` was called before the previous frame was exited.
    #[error("Previous enter_frame() had no matching exit_frame()")]
    FrameAlreadyEntered,

    /// Frame conversion error.
    #[error("Frame conversion error: {0}")]
    FrameConversion(String),

    /// Image file could not be written.
    #[error("Failed to write image {path}: {message}")]
    ImageWrite { path: String, message: String },

    /// Video writer could not be opened or written.
    #[error("Video writer error: {0}")]
    VideoWrite(String),

    /// Invalid four-character codec tag.
    #[error("Invalid FourCC tag: {0:?}")]
    InvalidFourCc(String),

    /// Preview display failed.
    #[error("Preview error: {0}")]
    Preview(String),

    /// No capture backend compiled in.
    #[error("Not supported: {0}")]
    NotSupported(String),
}

#[cfg(feature = "opencv")]
impl From<opencv::Error> for CaptureError {
    fn from(err: opencv::Error) -> Self {
        Self::Backend {
            message: err.message.clone(),
            source: Some(err),
        }
    }
}
