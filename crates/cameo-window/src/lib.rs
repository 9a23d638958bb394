//! Preview window and keyboard event pump.
//!
//! [`WindowManager`] owns a single named display surface and forwards
//! key presses to a registered callback. The surface itself is behind the
//! [`DisplaySurface`] trait; the OpenCV HighGUI implementation is enabled
//! with the `opencv` feature.

mod error;
#[cfg(feature = "opencv")]
mod highgui;
mod keys;
mod manager;
mod surface;

pub use error::WindowError;
#[cfg(feature = "opencv")]
pub use highgui::HighGuiSurface;
pub use keys::KeyCode;
pub use manager::{KeyCallback, WindowManager};
pub use surface::{default_surface, DisplaySurface};

use std::time::Duration;

/// How long `process_events` waits for a key press.
pub const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Result type for window operations.
pub type WindowResult<T> = Result<T, WindowError>;
