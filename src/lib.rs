//! EdgeStag Rust Extensions
//!
//! 3x3 convolution engine for single-channel 8-bit images, with Python
//! bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Every stage works on a [`SampleBuffer`]: a row-major grid of `u8`
//! grayscale samples. Colour images must be converted to luma before they
//! enter the engine; conversions from `image::GrayImage`, decoded
//! `image::DynamicImage`s and numpy `(height, width, 1)` arrays are provided.
//!
//! ## Filter Architecture
//! Each filter pads its input by replicating the border, convolves with one
//! or two fixed 3x3 kernels, merges/clamps the responses back to 8 bits and
//! strips the padding again, so output dimensions always equal input
//! dimensions. Filters are chained with a [`Pipeline`].
//!
//! Convolution and gradient combination are parallelised by row with Rayon;
//! results do not depend on scheduling.

pub mod buffer;
pub mod error;
pub mod filters;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::{Buffer, ResponseBuffer, SampleBuffer};
pub use error::{Error, Result};
pub use filters::{Blur, Filter, FilterKind, Scharr, Sobel};
pub use pipeline::{Pipeline, PipelineConfig, StageConfig, StageTiming, TimingBreakdown};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use ndarray::Axis;
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::buffer::SampleBuffer;
    use crate::error::Error;
    use crate::filters::{Filter, FilterKind};
    use crate::pipeline::{PipelineConfig, StageConfig};

    fn to_py_err(err: Error) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn into_py_image(py: Python<'_>, buffer: SampleBuffer) -> Bound<'_, PyArray3<u8>> {
        buffer.to_array().insert_axis(Axis(2)).into_pyarray(py)
    }

    /// Apply one filter ("blur", "sobel" or "scharr") to a (H, W, 1) u8 image.
    ///
    /// `threshold` overrides the filter's default noise floor.
    #[pyfunction]
    #[pyo3(signature = (image, filter, threshold=None))]
    pub fn apply_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        filter: &str,
        threshold: Option<i32>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = SampleBuffer::from_array_view(image.as_array()).map_err(to_py_err)?;
        let kind: FilterKind = filter.parse().map_err(to_py_err)?;
        let filter = match threshold {
            Some(threshold) => kind.build_with_threshold(threshold),
            None => kind.build(),
        };

        let output = py.allow_threads(|| filter.apply(&input)).map_err(to_py_err)?;
        Ok(into_py_image(py, output))
    }

    /// Run a chain of filters, given by name, over a (H, W, 1) u8 image.
    #[pyfunction]
    pub fn run_pipeline<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        filters: Vec<String>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = SampleBuffer::from_array_view(image.as_array()).map_err(to_py_err)?;
        let stages = filters
            .iter()
            .map(|name| name.parse::<FilterKind>().map(StageConfig::from))
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_py_err)?;
        let pipeline = PipelineConfig { stages }.build();

        let output = py.allow_threads(|| pipeline.run(input)).map_err(to_py_err)?;
        Ok(into_py_image(py, output))
    }

    /// Run a pipeline described as JSON: `{"stages": [{"kind": "sobel"}]}`.
    #[pyfunction]
    pub fn run_pipeline_json<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        config: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = SampleBuffer::from_array_view(image.as_array()).map_err(to_py_err)?;
        let pipeline = PipelineConfig::from_json(config).map_err(to_py_err)?.build();

        let output = py.allow_threads(|| pipeline.run(input)).map_err(to_py_err)?;
        Ok(into_py_image(py, output))
    }

    /// EdgeStag Rust extension module
    #[pymodule]
    pub fn edgestag_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(apply_filter, m)?)?;
        m.add_function(wrap_pyfunction!(run_pipeline, m)?)?;
        m.add_function(wrap_pyfunction!(run_pipeline_json, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::edgestag_rust;
