//! Window lifecycle and key dispatch.

use cameo_capture::{CaptureError, CaptureResult, Frame, PreviewSink};
use tracing::{debug, info, instrument, trace};

use crate::keys::KeyCode;
use crate::surface::DisplaySurface;
use crate::{WindowResult, EVENT_POLL_INTERVAL};

/// Callback invoked with each key press.
pub type KeyCallback = Box<dyn FnMut(KeyCode) + Send>;

/// Owns one named preview window.
pub struct WindowManager {
    name: String,
    surface: Box<dyn DisplaySurface>,
    key_callback: Option<KeyCallback>,
    is_window_created: bool,
}

impl WindowManager {
    /// Create a manager for the window called `name`. The window is not
    /// opened until [`create_window`](Self::create_window).
    pub fn new(name: impl Into<String>, surface: Box<dyn DisplaySurface>) -> Self {
        Self {
            name: name.into(),
            surface,
            key_callback: None,
            is_window_created: false,
        }
    }

    /// Register a key callback.
    pub fn with_key_callback(mut self, callback: impl FnMut(KeyCode) + Send + 'static) -> Self {
        self.key_callback = Some(Box::new(callback));
        self
    }

    /// Replace or clear the key callback.
    pub fn set_key_callback(&mut self, callback: Option<KeyCallback>) {
        self.key_callback = callback;
    }

    /// Returns true between `create_window` and `destroy_window`.
    pub fn is_window_created(&self) -> bool {
        self.is_window_created
    }

    /// Open the window.
    #[instrument(name = "window_create", skip(self), fields(name = %self.name))]
    pub fn create_window(&mut self) -> WindowResult<()> {
        self.surface.create(&self.name)?;
        self.is_window_created = true;
        info!("Window created");
        Ok(())
    }

    /// Draw a frame. Callers create the window first.
    pub fn show(&mut self, frame: &Frame) -> WindowResult<()> {
        trace!(width = frame.width(), height = frame.height(), "Showing frame");
        self.surface.show(&self.name, frame)
    }

    /// Close the window.
    #[instrument(name = "window_destroy", skip(self), fields(name = %self.name))]
    pub fn destroy_window(&mut self) -> WindowResult<()> {
        self.surface.destroy(&self.name)?;
        self.is_window_created = false;
        info!("Window destroyed");
        Ok(())
    }

    /// Poll once for a key press and hand it to the callback.
    ///
    /// At most one key is processed per call.
    pub fn process_events(&mut self) -> WindowResult<Option<KeyCode>> {
        let Some(key) = self
            .surface
            .poll_key(EVENT_POLL_INTERVAL)?
            .and_then(KeyCode::from_raw)
        else {
            return Ok(None);
        };

        debug!(code = key.code(), "Key pressed");
        if let Some(callback) = self.key_callback.as_mut() {
            callback(key);
        }

        Ok(Some(key))
    }
}

impl PreviewSink for WindowManager {
    fn show(&mut self, frame: &Frame) -> CaptureResult<()> {
        WindowManager::show(self, frame).map_err(|e| CaptureError::Preview(e.to_string()))
    }
}
