//! Captured frame buffer.

use std::path::Path;

use bytes::Bytes;
use image::{ExtendedColorType, ImageFormat};

use crate::error::CaptureError;
use crate::CaptureResult;

/// A decoded video frame.
///
/// Samples are interleaved 8-bit values in the backend's native order:
/// BGR for three channels, BGRA for four, luma for one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Bytes,
    width: u32,
    height: u32,
    channels: u8,
}

impl Frame {
    /// Create a frame, checking the buffer matches the dimensions.
    pub fn new(data: Bytes, width: u32, height: u32, channels: u8) -> CaptureResult<Self> {
        let frame = Self {
            data,
            width,
            height,
            channels,
        };
        frame.check_size()?;
        Ok(frame)
    }

    /// Interleaved pixel data, row-major with no padding.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples per pixel.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Fails unless the buffer length matches the dimensions.
    pub fn check_size(&self) -> CaptureResult<()> {
        let expected = Self::buffer_size(self.width, self.height, self.channels);
        if self.data.len() != expected {
            return Err(CaptureError::FrameConversion(format!(
                "Expected {} bytes ({}x{}x{}), got {}",
                expected,
                self.width,
                self.height,
                self.channels,
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Buffer size in bytes for the given geometry.
    pub fn buffer_size(width: u32, height: u32, channels: u8) -> usize {
        width as usize * height as usize * channels as usize
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Return a left-right flipped copy that shares no storage with `self`.
    pub fn mirrored(&self) -> Frame {
        let stride = self.stride();
        let pixel = self.channels as usize;
        let mut out = Vec::with_capacity(self.data.len());

        if stride > 0 {
            for row in self.data.chunks_exact(stride) {
                for px in row.chunks_exact(pixel).rev() {
                    out.extend_from_slice(px);
                }
            }
        }

        Frame {
            data: Bytes::from(out),
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    /// Write the frame to an image file, inferring the format from the
    /// file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> CaptureResult<()> {
        let path = path.as_ref();
        let write_error = |message: String| CaptureError::ImageWrite {
            path: path.display().to_string(),
            message,
        };

        self.check_size().map_err(|e| write_error(e.to_string()))?;
        let format = ImageFormat::from_path(path).map_err(|e| write_error(e.to_string()))?;

        let (pixels, color) = match self.channels {
            1 => (self.data.to_vec(), ExtendedColorType::L8),
            3 => (swap_red_blue(&self.data, 3), ExtendedColorType::Rgb8),
            4 => (swap_red_blue(&self.data, 4), ExtendedColorType::Rgba8),
            n => return Err(write_error(format!("unsupported channel count {n}"))),
        };

        image::save_buffer_with_format(path, &pixels, self.width, self.height, color, format)
            .map_err(|e| write_error(e.to_string()))
    }
}

/// Convert BGR(A) samples to RGB(A).
fn swap_red_blue(data: &[u8], pixel: usize) -> Vec<u8> {
    let mut out = data.to_vec();
    for px in out.chunks_exact_mut(pixel) {
        px.swap(0, 2);
    }
    out
}
