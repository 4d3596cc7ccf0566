//! Box blur.
//!
//! Averages every sample with its eight neighbours using [`BLUR_3X3`].
//! Borders are replicated before convolving, so a flat field stays flat
//! all the way to the edges.

use super::core::{apply_single_kernel, Filter};
use super::kernel::BLUR_3X3;
use crate::buffer::SampleBuffer;
use crate::error::Result;

/// 3x3 averaging filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blur {
    threshold: i32,
}

impl Blur {
    pub const DEFAULT_THRESHOLD: i32 = 0;

    pub fn new() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    /// Suppress averaged values below `threshold`.
    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }
}

impl Default for Blur {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for Blur {
    fn name(&self) -> &'static str {
        "blur"
    }

    fn apply(&self, input: &SampleBuffer) -> Result<SampleBuffer> {
        apply_single_kernel(input, &BLUR_3X3, self.threshold)
    }
}
