//! OpenCV HighGUI windows.

use std::time::Duration;

use cameo_capture::cv::frame_to_mat;
use cameo_capture::Frame;
use opencv::highgui;

use crate::surface::DisplaySurface;
use crate::WindowResult;

/// Windows managed by HighGUI.
#[derive(Debug, Default)]
pub struct HighGuiSurface;

impl HighGuiSurface {
    /// Create the surface.
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySurface for HighGuiSurface {
    fn create(&mut self, name: &str) -> WindowResult<()> {
        highgui::named_window(name, highgui::WINDOW_AUTOSIZE)?;
        Ok(())
    }

    fn show(&mut self, name: &str, frame: &Frame) -> WindowResult<()> {
        let mat = frame_to_mat(frame)?;
        highgui::imshow(name, &mat)?;
        Ok(())
    }

    fn destroy(&mut self, name: &str) -> WindowResult<()> {
        highgui::destroy_window(name)?;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> WindowResult<Option<i32>> {
        // wait_key(0) blocks forever, so never pass less than 1ms.
        let delay = timeout.as_millis().clamp(1, i32::MAX as u128) as i32;
        let code = highgui::wait_key(delay)?;
        Ok((code >= 0).then_some(code))
    }
}
