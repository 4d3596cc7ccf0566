//! Boundary handling for 3x3 convolution.
//!
//! [`pad`] grows a buffer by one sample on each side by replicating the
//! nearest edge (corners replicate the nearest corner). [`unpad`] strips
//! that border again, so `unpad(pad(x)) == x` for any non-empty `x`.
//!
//! ```text
//!   a b c        a a b c c
//!   d e f   ->   a a b c c
//!                d d e f f
//!                d d e f f
//! ```

use std::iter;

use crate::buffer::Buffer;
use crate::error::{Error, Result};

/// Replicate-pad `input` by one sample on every side.
///
/// # Errors
/// `EmptyInput` if `input` has no rows or no columns.
pub fn pad<T: Copy>(input: &Buffer<T>) -> Result<Buffer<T>> {
    let (rows, cols) = input.dim();
    if cols == 0 {
        return Err(Error::EmptyInput);
    }
    let (Some(top), Some(bottom)) = (input.rows().next(), input.rows().last()) else {
        return Err(Error::EmptyInput);
    };

    let padded_cols = cols + 2;
    let mut data = Vec::with_capacity((rows + 2) * padded_cols);

    for row in iter::once(top).chain(input.rows()).chain(iter::once(bottom)) {
        data.push(row[0]);
        data.extend_from_slice(row);
        data.push(row[cols - 1]);
    }

    log::trace!("pad {}x{} -> {}x{}", rows, cols, rows + 2, padded_cols);
    Ok(Buffer::from_parts(rows + 2, padded_cols, data))
}

/// Remove the one-sample border added by [`pad`].
///
/// # Errors
/// `InvalidDimensions` if either side is shorter than 3.
pub fn unpad<T: Copy>(input: &Buffer<T>) -> Result<Buffer<T>> {
    let (rows, cols) = input.dim();
    if rows < 3 || cols < 3 {
        return Err(Error::InvalidDimensions {
            rows,
            cols,
            reason: "need at least 3x3 to strip a one-pixel border",
        });
    }

    let data = input
        .rows()
        .skip(1)
        .take(rows - 2)
        .flat_map(|row| row[1..cols - 1].iter().copied())
        .collect();

    Ok(Buffer::from_parts(rows - 2, cols - 2, data))
}
