//! Video writer seam and codec tags.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::CaptureError;
use crate::frame::Frame;
use crate::CaptureResult;

/// A four-character codec tag such as `I420` or `MJPG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    /// Uncompressed planar YUV 4:2:0, playable from an AVI container.
    pub const I420: FourCc = FourCc(*b"I420");

    /// Motion JPEG.
    pub const MJPG: FourCc = FourCc(*b"MJPG");

    /// The tag as characters.
    pub fn chars(&self) -> [char; 4] {
        self.0.map(char::from)
    }

    /// Packed little-endian code, as used by most container libraries.
    pub fn code(&self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

impl Default for FourCc {
    fn default() -> Self {
        Self::I420
    }
}

impl FromStr for FourCc {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| CaptureError::InvalidFourCc(s.to_string()))?;

        if !bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            return Err(CaptureError::InvalidFourCc(s.to_string()));
        }

        Ok(Self(bytes))
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Parameters fixed when a video writer is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSpec {
    /// Output file.
    pub path: PathBuf,

    /// Codec tag.
    pub fourcc: FourCc,

    /// Frames per second written into the container.
    pub fps: f64,

    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,
}

/// An open video file accepting frames.
pub trait VideoWriter: Send {
    /// Append a frame.
    fn write(&mut self, frame: &Frame) -> CaptureResult<()>;

    /// Finalize the container.
    fn release(&mut self) -> CaptureResult<()>;
}

/// Opens video writers.
pub trait VideoWriterFactory: Send {
    /// Open a writer for `spec`.
    fn open(&mut self, spec: &VideoSpec) -> CaptureResult<Box<dyn VideoWriter>>;
}

/// Writer factory for the compiled-in backend.
#[cfg(feature = "opencv")]
pub fn default_writer_factory() -> CaptureResult<Box<dyn VideoWriterFactory>> {
    Ok(Box::new(crate::cv::OpenCvWriterFactory))
}

/// Writer factory (stub when no backend is compiled in).
#[cfg(not(feature = "opencv"))]
pub fn default_writer_factory() -> CaptureResult<Box<dyn VideoWriterFactory>> {
    Err(CaptureError::NotSupported(
        "Video recording requires the `opencv` feature".into(),
    ))
}
