//! Error types for the window module.

use thiserror::Error;

/// Errors that can occur during window operations.
#[derive(Debug, Error)]
pub enum WindowError {
    /// Backend library error.
    #[error("Backend error: {message}")]
    Backend {
        message: String,
        #[cfg(feature = "opencv")]
        #[source]
        source: Option<opencv::Error>,
    },

    /// Frame could not be converted for display.
    #[error("Frame conversion error: {0}")]
    Frame(#[from] cameo_capture::CaptureError),

    /// No display backend compiled in.
    #[error("Not supported: {0}")]
    NotSupported(String),
}

#[cfg(feature = "opencv")]
impl From<opencv::Error> for WindowError {
    fn from(err: opencv::Error) -> Self {
        Self::Backend {
            message: err.message.clone(),
            source: Some(err),
        }
    }
}
