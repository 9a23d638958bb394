//! OpenCV capture backend.

mod camera;
mod convert;
mod writer;

pub use camera::OpenCvCamera;
pub use convert::{frame_to_mat, mat_to_frame};
pub use writer::{OpenCvVideoWriter, OpenCvWriterFactory};
