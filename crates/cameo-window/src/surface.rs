//! Display surface seam.

use std::time::Duration;

use cameo_capture::Frame;

use crate::WindowResult;

/// A toolkit able to show named windows and report key presses.
pub trait DisplaySurface: Send {
    /// Create the window called `name`.
    fn create(&mut self, name: &str) -> WindowResult<()>;

    /// Draw `frame` into the window called `name`.
    fn show(&mut self, name: &str, frame: &Frame) -> WindowResult<()>;

    /// Tear down the window called `name`.
    fn destroy(&mut self, name: &str) -> WindowResult<()>;

    /// Wait up to `timeout` for a key press and return its raw code.
    fn poll_key(&mut self, timeout: Duration) -> WindowResult<Option<i32>>;
}

/// Display surface for the compiled-in backend.
#[cfg(feature = "opencv")]
pub fn default_surface() -> WindowResult<Box<dyn DisplaySurface>> {
    Ok(Box::new(crate::highgui::HighGuiSurface::new()))
}

/// Display surface (stub when no backend is compiled in).
#[cfg(not(feature = "opencv"))]
pub fn default_surface() -> WindowResult<Box<dyn DisplaySurface>> {
    Err(crate::WindowError::NotSupported(
        "Preview windows require the `opencv` feature".into(),
    ))
}
