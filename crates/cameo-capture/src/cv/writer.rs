//! Video files through `cv::VideoWriter`.

use opencv::core::Size;
use opencv::prelude::*;
use opencv::videoio;
use tracing::{debug, instrument};

use super::convert::frame_to_mat;
use crate::error::CaptureError;
use crate::frame::Frame;
use crate::video::{VideoSpec, VideoWriter, VideoWriterFactory};
use crate::CaptureResult;

/// Opens [`OpenCvVideoWriter`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenCvWriterFactory;

impl VideoWriterFactory for OpenCvWriterFactory {
    #[instrument(name = "video_writer_open", skip_all, fields(path = %spec.path.display()))]
    fn open(&mut self, spec: &VideoSpec) -> CaptureResult<Box<dyn VideoWriter>> {
        let [a, b, c, d] = spec.fourcc.chars();
        let fourcc = videoio::VideoWriter::fourcc(a, b, c, d)?;

        let path = spec.path.to_str().ok_or_else(|| {
            CaptureError::VideoWrite(format!("Non UTF-8 path: {}", spec.path.display()))
        })?;

        let writer = videoio::VideoWriter::new(
            path,
            fourcc,
            spec.fps,
            Size::new(spec.width as i32, spec.height as i32),
            true,
        )?;

        if !writer.is_opened()? {
            return Err(CaptureError::VideoWrite(format!(
                "Could not open {} with codec {}",
                path, spec.fourcc
            )));
        }

        debug!(fps = spec.fps, codec = %spec.fourcc, "Video writer opened");
        Ok(Box::new(OpenCvVideoWriter { writer }))
    }
}

/// An open OpenCV video file.
pub struct OpenCvVideoWriter {
    writer: videoio::VideoWriter,
}

impl VideoWriter for OpenCvVideoWriter {
    fn write(&mut self, frame: &Frame) -> CaptureResult<()> {
        let mat = frame_to_mat(frame)?;
        self.writer.write(&mat)?;
        Ok(())
    }

    fn release(&mut self) -> CaptureResult<()> {
        self.writer.release()?;
        Ok(())
    }
}
