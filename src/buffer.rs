//! Row-major sample buffers.
//!
//! [`Buffer`] is the data type flowing through every stage of the engine.
//! Samples are stored contiguously, row after row, and every `(row, col)`
//! access goes through a bounds-checked index computation.
//!
//! Two instantiations are used throughout the crate:
//! - [`SampleBuffer`] - 8-bit grayscale samples (0-255)
//! - [`ResponseBuffer`] - raw signed convolution responses, not clamped

use image::{DynamicImage, GrayImage};
use ndarray::{Array2, ArrayView2, ArrayView3, Axis};
use num_traits::ToPrimitive;

use crate::error::{Error, Result};

/// Owned, row-major 2D grid of samples.
///
/// Invariant: `data.len() == width * height`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Buffer<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Single-channel 8-bit image.
pub type SampleBuffer = Buffer<u8>;

/// Signed convolution output, same layout as the buffer it was computed from.
pub type ResponseBuffer = Buffer<i32>;

impl<T> Buffer<T> {
    /// Wrap row-major `data` as a `rows` x `cols` buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let expected = rows.checked_mul(cols).ok_or(Error::InvalidDimensions {
            rows,
            cols,
            reason: "size overflows usize",
        })?;

        if data.len() != expected {
            return Err(Error::InvalidDimensions {
                rows,
                cols,
                reason: "sample count does not match rows * cols",
            });
        }

        Ok(Self {
            width: cols,
            height: rows,
            data,
        })
    }

    /// Internal constructor for buffers whose size was derived from an
    /// existing, already validated buffer.
    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self {
            width: cols,
            height: rows,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(rows, cols)`, i.e. `(height, width)`.
    pub fn dim(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the buffer has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Map `(row, col)` to the offset in the flat sample storage.
    pub fn index_of(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.height || col >= self.width {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.height,
                cols: self.width,
            });
        }
        Ok(row * self.width + col)
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let idx = self.index_of(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate over the rows from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        let width = self.width;
        (0..self.height).map(move |row| &self.data[row * width..(row + 1) * width])
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Copy> Buffer<T> {
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        let idx = self.index_of(row, col)?;
        Ok(self.data[idx])
    }

    /// Create a `rows` x `cols` buffer with every sample set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Result<Self> {
        let len = rows.checked_mul(cols).ok_or(Error::InvalidDimensions {
            rows,
            cols,
            reason: "size overflows usize",
        })?;
        Ok(Self::from_parts(rows, cols, vec![value; len]))
    }

    /// Apply `f` to every sample, keeping the layout.
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> Buffer<U> {
        Buffer::from_parts(self.height, self.width, self.data.iter().map(|&v| f(v)).collect())
    }

    /// Copy into an ndarray of shape `(rows, cols)`.
    pub fn to_array(&self) -> Array2<T> {
        let width = self.width;
        Array2::from_shape_fn((self.height, self.width), |(row, col)| {
            self.data[row * width + col]
        })
    }

    /// Copy a 2D ndarray view, whatever its memory order.
    pub fn from_array(view: ArrayView2<'_, T>) -> Self {
        let (rows, cols) = view.dim();
        Self::from_parts(rows, cols, view.iter().copied().collect())
    }
}

impl<T: Copy + Default> Buffer<T> {
    /// Zero-filled (default-filled) buffer of `rows` x `cols`.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, T::default())
    }
}

impl SampleBuffer {
    /// Build a buffer from literal row data.
    ///
    /// Values outside 0-255 saturate to the nearest bound.
    ///
    /// # Errors
    /// * `EmptyInput` - no rows, or the first row has no columns
    /// * `RaggedInput` - rows of differing lengths
    pub fn from_rows<V, R>(rows: &[R]) -> Result<Self>
    where
        V: ToPrimitive + Copy,
        R: AsRef<[V]>,
    {
        let cols = match rows.first() {
            Some(first) if !first.as_ref().is_empty() => first.as_ref().len(),
            _ => return Err(Error::EmptyInput),
        };

        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::RaggedInput {
                    row: row_idx,
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend(row.iter().map(|v| saturate_u8(*v)));
        }

        Ok(Self::from_parts(rows.len(), cols, data))
    }

    pub fn from_gray_image(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        let data = image.pixels().map(|p| p.0[0]).collect();
        Self::from_parts(height as usize, width as usize, data)
    }

    /// Accept a decoded image only if it already is single-channel 8-bit.
    pub fn from_dynamic_image(image: &DynamicImage) -> Result<Self> {
        match image {
            DynamicImage::ImageLuma8(gray) => Ok(Self::from_gray_image(gray)),
            other => Err(Error::UnsupportedChannelLayout(format!(
                "{:?}, expected L8",
                other.color()
            ))),
        }
    }

    /// Accept a `(height, width, channels)` view as produced by numpy.
    /// Only `channels == 1` is supported.
    pub fn from_array_view(view: ArrayView3<'_, u8>) -> Result<Self> {
        let (_, _, channels) = view.dim();
        if channels != 1 {
            return Err(Error::UnsupportedChannelLayout(format!(
                "{channels} channels, expected 1"
            )));
        }
        Ok(Self::from_array(view.index_axis(Axis(2), 0)))
    }

    pub fn to_gray_image(&self) -> Result<GrayImage> {
        let too_large = Error::InvalidDimensions {
            rows: self.height,
            cols: self.width,
            reason: "too large for an image",
        };
        let width = u32::try_from(self.width).map_err(|_| too_large.clone())?;
        let height = u32::try_from(self.height).map_err(|_| too_large.clone())?;
        GrayImage::from_raw(width, height, self.data.clone()).ok_or(too_large)
    }

    /// Hand out the raw row-major bytes together with `(width, height)`.
    pub fn into_raw_parts(self) -> (Vec<u8>, usize, usize) {
        (self.data, self.width, self.height)
    }
}

#[inline]
fn saturate_u8<V: ToPrimitive>(value: V) -> u8 {
    match value.to_f64() {
        Some(v) if v.is_nan() => 0,
        Some(v) => v.clamp(0.0, 255.0) as u8,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_new_is_zero_filled() {
        let buf = SampleBuffer::new(3, 4).unwrap();
        assert_eq!(buf.dim(), (3, 4));
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 3);
        assert!(buf.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_new_rejects_overflowing_size() {
        let err = SampleBuffer::new(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_get_set_row_major() {
        let mut buf = SampleBuffer::new(2, 3).unwrap();
        buf.set(1, 2, 42).unwrap();
        assert_eq!(buf.get(1, 2).unwrap(), 42);
        assert_eq!(buf.index_of(1, 2).unwrap(), 5);
        assert_eq!(buf.as_slice()[5], 42);
    }

    #[test]
    fn test_out_of_bounds_access_is_rejected() {
        let mut buf = SampleBuffer::new(2, 3).unwrap();
        assert_eq!(
            buf.get(2, 0),
            Err(Error::IndexOutOfBounds { row: 2, col: 0, rows: 2, cols: 3 })
        );
        // (0, 3) would alias (1, 0) without the column check.
        assert!(buf.get(0, 3).is_err());
        assert!(buf.set(0, 3, 1).is_err());
        assert_eq!(buf.get(1, 0).unwrap(), 0);
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Buffer::from_vec(2, 2, vec![1u8, 2, 3, 4]).is_ok());
        let err = Buffer::from_vec(2, 2, vec![1u8, 2, 3]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { rows: 2, cols: 2, .. }));
    }

    #[test]
    fn test_from_rows() {
        let buf = SampleBuffer::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(buf.dim(), (2, 3));
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(buf.get(1, 0).unwrap(), 4);
    }

    #[test]
    fn test_from_rows_saturates_out_of_range_values() {
        let buf = SampleBuffer::from_rows(&[[-20i32, 300, 128]]).unwrap();
        assert_eq!(buf.as_slice(), &[0, 255, 128]);

        let buf = SampleBuffer::from_rows(&[[12.7f32, f32::NAN]]).unwrap();
        assert_eq!(buf.as_slice(), &[12, 0]);
    }

    #[test]
    fn test_from_rows_rejects_empty_and_ragged() {
        let empty: Vec<Vec<u8>> = Vec::new();
        assert_eq!(SampleBuffer::from_rows(empty.as_slice()), Err(Error::EmptyInput));
        assert_eq!(
            SampleBuffer::from_rows(&[Vec::<u8>::new()]),
            Err(Error::EmptyInput)
        );
        assert_eq!(
            SampleBuffer::from_rows(&[vec![1u8, 2], vec![3]]),
            Err(Error::RaggedInput { row: 1, expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_rows_iterates_top_to_bottom() {
        let buf = SampleBuffer::from_rows(&[[1u8, 2], [3, 4], [5, 6]]).unwrap();
        let rows: Vec<&[u8]> = buf.rows().collect();
        assert_eq!(rows, vec![&[1u8, 2][..], &[3, 4][..], &[5, 6][..]]);
    }

    #[test]
    fn test_gray_image_round_trip() {
        let buf = SampleBuffer::from_rows(&[[10u8, 20, 30], [40, 50, 60]]).unwrap();
        let image = buf.to_gray_image().unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [60]);
        assert_eq!(SampleBuffer::from_gray_image(&image), buf);
    }

    #[test]
    fn test_dynamic_image_requires_single_channel() {
        let gray = DynamicImage::new_luma8(4, 2);
        let buf = SampleBuffer::from_dynamic_image(&gray).unwrap();
        assert_eq!(buf.dim(), (2, 4));

        let rgb = DynamicImage::new_rgb8(4, 2);
        assert!(matches!(
            SampleBuffer::from_dynamic_image(&rgb),
            Err(Error::UnsupportedChannelLayout(_))
        ));
    }

    #[test]
    fn test_array_view_channel_check() {
        let mut img = Array3::<u8>::zeros((2, 3, 1));
        img[[1, 2, 0]] = 9;
        let buf = SampleBuffer::from_array_view(img.view()).unwrap();
        assert_eq!(buf.get(1, 2).unwrap(), 9);

        let rgba = Array3::<u8>::zeros((2, 3, 4));
        assert!(matches!(
            SampleBuffer::from_array_view(rgba.view()),
            Err(Error::UnsupportedChannelLayout(_))
        ));
    }

    #[test]
    fn test_array_conversion_respects_layout() {
        let buf = SampleBuffer::from_rows(&[[1u8, 2, 3], [4, 5, 6]]).unwrap();
        let arr = buf.to_array();
        assert_eq!(arr.dim(), (2, 3));
        assert_eq!(arr[[1, 0]], 4);

        // Transposed view is not in standard layout.
        let transposed = SampleBuffer::from_array(arr.t());
        assert_eq!(transposed.dim(), (3, 2));
        assert_eq!(transposed.as_slice(), &[1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_into_raw_parts() {
        let buf = SampleBuffer::filled(2, 3, 7).unwrap();
        let (data, width, height) = buf.into_raw_parts();
        assert_eq!((width, height), (3, 2));
        assert_eq!(data, vec![7; 6]);
    }
}
