//! Edge detection filters: Sobel and Scharr.
//!
//! Both convolve the padded input with a horizontal and a vertical gradient
//! kernel and merge the two responses with the L1 magnitude
//! `(|gx| + |gy|) / 2` (see [`combine`](super::gradient::combine)).
//! Magnitudes below the threshold (default 50) are suppressed.
//!
//! | Filter | X kernel | Y kernel |
//! |--------|----------|----------|
//! | Sobel  | `[[-1,0,1],[-2,0,2],[-1,0,1]]` | `[[1,2,1],[0,0,0],[-1,-2,-1]]` |
//! | Scharr | `[[-3,0,3],[-10,0,10],[-3,0,3]]` | `[[3,10,3],[0,0,0],[-3,-10,-3]]` |

use super::core::{apply_directional_kernels, Filter};
use super::kernel::{SCHARR_X_3X3, SCHARR_Y_3X3, SOBEL_X_3X3, SOBEL_Y_3X3};
use crate::buffer::SampleBuffer;
use crate::error::Result;

/// Default noise floor for gradient magnitudes.
pub const GRADIENT_THRESHOLD: i32 = 50;

// ============================================================================
// Sobel
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sobel {
    threshold: i32,
}

impl Sobel {
    pub const DEFAULT_THRESHOLD: i32 = GRADIENT_THRESHOLD;

    pub fn new() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }
}

impl Default for Sobel {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for Sobel {
    fn name(&self) -> &'static str {
        "sobel"
    }

    fn apply(&self, input: &SampleBuffer) -> Result<SampleBuffer> {
        apply_directional_kernels(input, &SOBEL_X_3X3, &SOBEL_Y_3X3, self.threshold)
    }
}

// ============================================================================
// Scharr
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scharr {
    threshold: i32,
}

impl Scharr {
    pub const DEFAULT_THRESHOLD: i32 = GRADIENT_THRESHOLD;

    pub fn new() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }
}

impl Default for Scharr {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for Scharr {
    fn name(&self) -> &'static str {
        "scharr"
    }

    fn apply(&self, input: &SampleBuffer) -> Result<SampleBuffer> {
        apply_directional_kernels(input, &SCHARR_X_3X3, &SCHARR_Y_3X3, self.threshold)
    }
}
