//! Capture device seam.

use crate::frame::Frame;
use crate::CaptureResult;

/// Numeric properties reported by a capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceProperty {
    /// Frame rate; `0.0` when the device does not know it.
    Fps,

    /// Frame width in pixels.
    FrameWidth,

    /// Frame height in pixels.
    FrameHeight,
}

/// A camera or stream that supports two-phase capture.
pub trait CaptureDevice: Send {
    /// Request the next raw frame without decoding it.
    fn grab(&mut self) -> CaptureResult<bool>;

    /// Decode the most recently grabbed frame from `channel`.
    ///
    /// Returns `None` when nothing could be decoded.
    fn retrieve(&mut self, channel: u32) -> CaptureResult<Option<Frame>>;

    /// Read a device property.
    fn get(&self, property: DeviceProperty) -> CaptureResult<f64>;
}

/// Open the camera at `index` with the compiled-in backend.
#[cfg(feature = "opencv")]
pub fn open_camera(index: i32) -> CaptureResult<Box<dyn CaptureDevice>> {
    let camera = crate::cv::OpenCvCamera::open(index)?;
    Ok(Box::new(camera))
}

/// Open a camera (stub when no backend is compiled in).
#[cfg(not(feature = "opencv"))]
pub fn open_camera(_index: i32) -> CaptureResult<Box<dyn CaptureDevice>> {
    Err(crate::CaptureError::NotSupported(
        "Camera capture requires the `opencv` feature".into(),
    ))
}
