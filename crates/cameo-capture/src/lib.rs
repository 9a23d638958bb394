//! Camera frame lifecycle for the Cameo preview application.
//!
//! This crate owns the capture device seam and the two-phase
//! grab/retrieve cycle driven by [`CaptureManager`]: each cycle may
//! mirror the frame into a preview, persist it as a screenshot, and
//! append it to a lazily opened video writer.

mod clock;
mod device;
mod error;
mod fps;
mod frame;
mod manager;
#[cfg(feature = "opencv")]
pub mod cv;
#[cfg(test)]
mod testing;
mod video;

pub use clock::{Clock, SystemClock};
pub use device::{open_camera, CaptureDevice, DeviceProperty};
pub use error::CaptureError;
pub use fps::FpsEstimator;
pub use frame::Frame;
pub use manager::{CaptureManager, SharedPreview};
pub use video::{default_writer_factory, FourCc, VideoSpec, VideoWriter, VideoWriterFactory};

/// Frames that must elapse before the running FPS estimate is trusted
/// for opening a video writer when the device does not report its rate.
pub const FPS_WARMUP_FRAMES: u64 = 20;

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// A display target for captured frames.
pub trait PreviewSink: Send {
    /// Present a frame.
    fn show(&mut self, frame: &Frame) -> CaptureResult<()>;
}
