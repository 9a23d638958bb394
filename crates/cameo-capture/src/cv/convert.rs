//! Conversion between OpenCV matrices and [`Frame`]s.

use bytes::Bytes;
use opencv::core::{Mat, Scalar, CV_8U, CV_8UC1, CV_8UC3, CV_8UC4};
use opencv::prelude::*;

use crate::error::CaptureError;
use crate::frame::Frame;
use crate::CaptureResult;

/// Copy an 8-bit matrix into an owned frame.
pub fn mat_to_frame(mat: &Mat) -> CaptureResult<Frame> {
    if mat.depth() != CV_8U {
        return Err(CaptureError::FrameConversion(format!(
            "Unsupported matrix depth {}",
            mat.depth()
        )));
    }

    // Sub-matrices have row padding; cloning compacts them.
    let compact;
    let mat = if mat.is_continuous() {
        mat
    } else {
        compact = mat.try_clone()?;
        &compact
    };

    let data = Bytes::copy_from_slice(mat.data_bytes()?);
    Frame::new(
        data,
        mat.cols() as u32,
        mat.rows() as u32,
        mat.channels() as u8,
    )
}

/// Copy a frame into a newly allocated matrix.
pub fn frame_to_mat(frame: &Frame) -> CaptureResult<Mat> {
    frame.check_size()?;
    let typ = match frame.channels() {
        1 => CV_8UC1,
        3 => CV_8UC3,
        4 => CV_8UC4,
        n => {
            return Err(CaptureError::FrameConversion(format!(
                "Unsupported channel count {n}"
            )))
        }
    };

    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        typ,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(frame.data());

    Ok(mat)
}
