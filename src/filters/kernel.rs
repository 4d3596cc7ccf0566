//! 3x3 convolution kernels and the convolution hot path.
//!
//! A [`Kernel`] is generic over its weight type so integer kernels (Sobel,
//! Scharr) and floating point kernels (box blur) share one algorithm.
//! Samples and weights are widened into an accumulator type and the sum is
//! saturated into a signed 32-bit response.
//!
//! ## Parallelism
//!
//! Convolution is split by output row with Rayon. Each row reads only its
//! own and the two neighbouring input rows and writes only its own output
//! row, so the result does not depend on scheduling.

use std::fmt::Debug;

use num_traits::{Num, Zero};
use rayon::prelude::*;

use crate::buffer::{ResponseBuffer, SampleBuffer};

/// Numeric type usable as kernel weight.
///
/// Products and sums are carried in [`KernelWeight::Acc`], which is wider
/// than the weight so a full 3x3 neighbourhood of 255 samples cannot
/// overflow it.
pub trait KernelWeight: Num + Copy + Send + Sync + Debug {
    type Acc: Num + Copy;

    /// Widen an 8-bit sample into the accumulator type.
    fn from_sample(sample: u8) -> Self::Acc;

    /// Widen a weight into the accumulator type.
    fn widen(self) -> Self::Acc;

    /// Convert an accumulated sum into a signed response, saturating at
    /// the `i32` range.
    fn into_response(acc: Self::Acc) -> i32;
}

impl KernelWeight for i32 {
    type Acc = i64;

    #[inline]
    fn from_sample(sample: u8) -> i64 {
        i64::from(sample)
    }

    #[inline]
    fn widen(self) -> i64 {
        i64::from(self)
    }

    #[inline]
    fn into_response(acc: i64) -> i32 {
        acc.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

impl KernelWeight for i64 {
    type Acc = i128;

    #[inline]
    fn from_sample(sample: u8) -> i128 {
        i128::from(sample)
    }

    #[inline]
    fn widen(self) -> i128 {
        i128::from(self)
    }

    #[inline]
    fn into_response(acc: i128) -> i32 {
        acc.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32
    }
}

impl KernelWeight for f32 {
    type Acc = f64;

    #[inline]
    fn from_sample(sample: u8) -> f64 {
        f64::from(sample)
    }

    #[inline]
    fn widen(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn into_response(acc: f64) -> i32 {
        // Float-to-int `as` saturates and maps NaN to 0
        acc.round() as i32
    }
}

impl KernelWeight for f64 {
    type Acc = f64;

    #[inline]
    fn from_sample(sample: u8) -> f64 {
        f64::from(sample)
    }

    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn into_response(acc: f64) -> i32 {
        acc.round() as i32
    }
}

/// Fixed 3x3 weight matrix, indexed `[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel<W> {
    weights: [[W; 3]; 3],
}

impl<W> Kernel<W> {
    pub const fn new(weights: [[W; 3]; 3]) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &[[W; 3]; 3] {
        &self.weights
    }
}

impl<W: KernelWeight> Kernel<W> {
    /// Weighted sum of the 3x3 neighbourhood centred on column `x` of
    /// `centre`. `x` must satisfy `1 <= x < len - 1`.
    #[inline]
    fn respond(&self, above: &[u8], centre: &[u8], below: &[u8], x: usize) -> i32 {
        let mut acc = <W::Acc as Zero>::zero();
        for (row, weights) in [above, centre, below].into_iter().zip(&self.weights) {
            for (&sample, &weight) in row[x - 1..=x + 1].iter().zip(weights) {
                acc = acc + W::from_sample(sample) * weight.widen();
            }
        }
        W::into_response(acc)
    }
}

/// 3x3 box blur, every weight 1/9.
pub const BLUR_3X3: Kernel<f32> = Kernel::new([[1.0 / 9.0; 3]; 3]);

/// Sobel horizontal-gradient kernel.
pub const SOBEL_X_3X3: Kernel<i32> = Kernel::new([[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]]);
/// Sobel vertical-gradient kernel.
pub const SOBEL_Y_3X3: Kernel<i32> = Kernel::new([[1, 2, 1], [0, 0, 0], [-1, -2, -1]]);

/// Scharr horizontal-gradient kernel.
pub const SCHARR_X_3X3: Kernel<i32> = Kernel::new([[-3, 0, 3], [-10, 0, 10], [-3, 0, 3]]);
/// Scharr vertical-gradient kernel.
pub const SCHARR_Y_3X3: Kernel<i32> = Kernel::new([[3, 10, 3], [0, 0, 0], [-3, -10, -3]]);

/// Convolve every interior sample of `input` with `kernel`.
///
/// The output has the same dimensions as `input`. Its one-sample border is
/// left at zero, so `input` is expected to be padded first
/// (see [`pad`](super::padding::pad)).
///
/// # Arguments
/// * `input` - Padded 8-bit buffer
/// * `kernel` - 3x3 weights
/// * `threshold` - If positive, responses with magnitude below it become 0
///
/// # Returns
/// Raw signed response buffer
pub fn convolve<W: KernelWeight>(
    input: &SampleBuffer,
    kernel: &Kernel<W>,
    threshold: i32,
) -> ResponseBuffer {
    let (height, width) = input.dim();
    let mut output = vec![0i32; height * width];

    if height < 3 || width < 3 {
        return ResponseBuffer::from_parts(height, width, output);
    }

    let rows: Vec<&[u8]> = input.rows().collect();
    let cutoff = threshold.max(0).unsigned_abs();

    output
        .par_chunks_mut(width)
        .enumerate()
        .skip(1)
        .take(height - 2)
        .for_each(|(y, out_row)| {
            let (above, centre, below) = (rows[y - 1], rows[y], rows[y + 1]);
            for x in 1..width - 1 {
                let value = kernel.respond(above, centre, below, x);
                out_row[x] = if value.unsigned_abs() < cutoff { 0 } else { value };
            }
        });

    log::trace!("convolve {}x{} with {:?}", height, width, kernel.weights());
    ResponseBuffer::from_parts(height, width, output)
}
