//! Core filter abstractions shared by all filter variants.
//!
//! This module provides:
//! - The [`Filter`] trait every pipeline stage implements
//! - [`FilterKind`] for constructing filters by name
//! - The two apply paths: single kernel and directional X/Y kernels

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::blur::Blur;
use super::edge::{Scharr, Sobel};
use super::gradient::{clamp_response, combine};
use super::kernel::{convolve, Kernel, KernelWeight};
use super::padding::{pad, unpad};
use crate::buffer::SampleBuffer;
use crate::error::{Error, Result};

/// A stateless image operation: 8-bit buffer in, same-sized 8-bit buffer out.
///
/// Implementations never mutate their input and are safe to share between
/// threads.
pub trait Filter: Send + Sync + fmt::Debug {
    /// Short lower-case name, used in logs and stage errors.
    fn name(&self) -> &'static str;

    fn apply(&self, input: &SampleBuffer) -> Result<SampleBuffer>;
}

/// The available filter variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Blur,
    Sobel,
    Scharr,
}

impl FilterKind {
    pub const ALL: [FilterKind; 3] = [FilterKind::Blur, FilterKind::Sobel, FilterKind::Scharr];

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Blur => "blur",
            FilterKind::Sobel => "sobel",
            FilterKind::Scharr => "scharr",
        }
    }

    /// Threshold the filter uses when none is given.
    pub fn default_threshold(self) -> i32 {
        match self {
            FilterKind::Blur => Blur::DEFAULT_THRESHOLD,
            FilterKind::Sobel => Sobel::DEFAULT_THRESHOLD,
            FilterKind::Scharr => Scharr::DEFAULT_THRESHOLD,
        }
    }

    /// Build the filter with its default threshold.
    pub fn build(self) -> Arc<dyn Filter> {
        self.build_with_threshold(self.default_threshold())
    }

    pub fn build_with_threshold(self, threshold: i32) -> Arc<dyn Filter> {
        match self {
            FilterKind::Blur => Arc::new(Blur::new().with_threshold(threshold)),
            FilterKind::Sobel => Arc::new(Sobel::new().with_threshold(threshold)),
            FilterKind::Scharr => Arc::new(Scharr::new().with_threshold(threshold)),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownFilter(s.to_string()))
    }
}

/// pad -> convolve -> clamp -> unpad.
///
/// The threshold is applied both to the raw response and to the clamped
/// output.
pub(crate) fn apply_single_kernel<W: KernelWeight>(
    input: &SampleBuffer,
    kernel: &Kernel<W>,
    threshold: i32,
) -> Result<SampleBuffer> {
    let padded = pad(input)?;
    let response = convolve(&padded, kernel, threshold);
    unpad(&clamp_response(&response, threshold))
}

/// pad -> convolve X and Y -> combine -> unpad.
///
/// The directional responses are left unthresholded; only the combined
/// magnitude is compared against `threshold`.
pub(crate) fn apply_directional_kernels<W: KernelWeight>(
    input: &SampleBuffer,
    kernel_x: &Kernel<W>,
    kernel_y: &Kernel<W>,
    threshold: i32,
) -> Result<SampleBuffer> {
    let padded = pad(input)?;
    let (gx, gy) = rayon::join(
        || convolve(&padded, kernel_x, 0),
        || convolve(&padded, kernel_y, 0),
    );
    unpad(&combine(&gx, &gy, threshold)?)
}
