//! 3x3 convolution filters for single-channel 8-bit images.
//!
//! ## Building Blocks
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`padding`] | Edge-replicating border of one pixel, and its removal |
//! | [`kernel`] | Numeric-generic 3x3 kernels and the row-parallel convolution |
//! | [`gradient`] | L1 gradient magnitude, clamping and thresholding |
//! | [`core`] | The [`Filter`] trait and [`FilterKind`] |
//!
//! ## Filters
//!
//! | Filter | Kernel(s) | Threshold | Output |
//! |--------|-----------|-----------|--------|
//! | [`Blur`] | 1/9 box | 0 | clamped average |
//! | [`Sobel`] | Sobel X/Y | 50 | L1 magnitude |
//! | [`Scharr`] | Scharr X/Y | 50 | L1 magnitude |
//!
//! Every filter runs pad -> convolve -> (combine) -> unpad, so the output
//! always has the input's dimensions.

pub mod padding;
pub mod kernel;
pub mod gradient;
pub mod core;
pub mod blur;
pub mod edge;

pub use self::blur::Blur;
pub use self::core::{Filter, FilterKind};
pub use self::edge::{Scharr, Sobel};
