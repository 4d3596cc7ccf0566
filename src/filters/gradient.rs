//! Turning raw convolution responses into 8-bit output.
//!
//! - [`combine`] merges an X and a Y response into a gradient magnitude
//!   using the L1 approximation `(|gx| + |gy|) / 2`
//! - [`clamp_response`] passes a single response through, clamped to 0-255
//!
//! Both apply the same threshold rule: values below the threshold become 0.

use rayon::prelude::*;

use crate::buffer::{ResponseBuffer, SampleBuffer};
use crate::error::{Error, Result};

/// Scale applied to `|gx| + |gy|`.
pub const NORMALIZATION_FACTOR: f32 = 0.5;

/// Combine two directional responses into a thresholded gradient magnitude.
///
/// `output = clamp(round((|gx| + |gy|) * 0.5), 0, 255)`, forced to 0 when
/// below `threshold`.
///
/// # Errors
/// `DimensionMismatch` if `gx` and `gy` differ in size.
pub fn combine(gx: &ResponseBuffer, gy: &ResponseBuffer, threshold: i32) -> Result<SampleBuffer> {
    if gx.dim() != gy.dim() {
        let ((left_rows, left_cols), (right_rows, right_cols)) = (gx.dim(), gy.dim());
        return Err(Error::DimensionMismatch {
            left_rows,
            left_cols,
            right_rows,
            right_cols,
        });
    }

    let (height, width) = gx.dim();
    let mut output = vec![0u8; height * width];
    if output.is_empty() {
        return Ok(SampleBuffer::from_parts(height, width, output));
    }

    let (gx, gy) = (gx.as_slice(), gy.as_slice());
    output
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            let start = y * width;
            let row_x = &gx[start..start + width];
            let row_y = &gy[start..start + width];
            for ((out, &vx), &vy) in out_row.iter_mut().zip(row_x).zip(row_y) {
                let sum = u64::from(vx.unsigned_abs()) + u64::from(vy.unsigned_abs());
                let magnitude = (sum as f32 * NORMALIZATION_FACTOR).round().min(255.0) as i32;
                *out = apply_threshold(magnitude, threshold);
            }
        });

    log::trace!("combine {}x{}", height, width);
    Ok(SampleBuffer::from_parts(height, width, output))
}

/// Clamp a single-kernel response to 0-255, forcing values below
/// `threshold` to 0.
pub fn clamp_response(response: &ResponseBuffer, threshold: i32) -> SampleBuffer {
    response.map(|v| apply_threshold(v.clamp(0, 255), threshold))
}

#[inline]
fn apply_threshold(value: i32, threshold: i32) -> u8 {
    if value < threshold {
        0
    } else {
        value.clamp(0, 255) as u8
    }
}
