//! Camera capture through `cv::VideoCapture`.

use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use tracing::{debug, info, instrument};

use super::convert::mat_to_frame;
use crate::device::{CaptureDevice, DeviceProperty};
use crate::error::CaptureError;
use crate::frame::Frame;
use crate::CaptureResult;

/// A camera opened by index.
pub struct OpenCvCamera {
    capture: VideoCapture,
    index: i32,
}

impl OpenCvCamera {
    /// Open the camera at `index` with any available API.
    #[instrument(name = "camera_open")]
    pub fn open(index: i32) -> CaptureResult<Self> {
        let capture = VideoCapture::new(index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(CaptureError::SourceNotFound(format!("camera {index}")));
        }

        let camera = Self { capture, index };
        info!(
            fps = camera.get(DeviceProperty::Fps)?,
            width = camera.get(DeviceProperty::FrameWidth)?,
            height = camera.get(DeviceProperty::FrameHeight)?,
            "Camera opened"
        );

        Ok(camera)
    }
}

impl CaptureDevice for OpenCvCamera {
    fn grab(&mut self) -> CaptureResult<bool> {
        Ok(self.capture.grab()?)
    }

    fn retrieve(&mut self, channel: u32) -> CaptureResult<Option<Frame>> {
        let mut mat = Mat::default();
        if !self.capture.retrieve(&mut mat, channel as i32)? || mat.empty() {
            return Ok(None);
        }

        mat_to_frame(&mat).map(Some)
    }

    fn get(&self, property: DeviceProperty) -> CaptureResult<f64> {
        let id = match property {
            DeviceProperty::Fps => videoio::CAP_PROP_FPS,
            DeviceProperty::FrameWidth => videoio::CAP_PROP_FRAME_WIDTH,
            DeviceProperty::FrameHeight => videoio::CAP_PROP_FRAME_HEIGHT,
        };
        Ok(self.capture.get(id)?)
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        debug!(index = self.index, "Releasing camera");
        let _ = self.capture.release();
    }
}
