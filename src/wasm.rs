//! WebAssembly exports for EdgeStag filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images are
//! passed as flat row-major grayscale bytes (length = width * height).
//! Errors surface as rejected values carrying the error message.

use wasm_bindgen::prelude::*;

use crate::buffer::SampleBuffer;
use crate::error::Error;
use crate::filters::{Filter, FilterKind};
use crate::pipeline::PipelineConfig;

fn to_js_err(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn input_buffer(data: &[u8], width: usize, height: usize) -> Result<SampleBuffer, JsValue> {
    SampleBuffer::from_vec(height, width, data.to_vec()).map_err(to_js_err)
}

/// Apply one filter by name ("blur", "sobel", "scharr").
///
/// # Arguments
/// * `data` - Flat array of grayscale bytes (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `filter` - Filter name
/// * `threshold` - Optional override of the filter's default threshold
///
/// # Returns
/// Flat array of filtered grayscale bytes
#[wasm_bindgen]
pub fn apply_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    filter: &str,
    threshold: Option<i32>,
) -> Result<Vec<u8>, JsValue> {
    let input = input_buffer(data, width, height)?;
    let kind: FilterKind = filter.parse().map_err(to_js_err)?;
    let threshold = threshold.unwrap_or_else(|| kind.default_threshold());
    let output = kind
        .build_with_threshold(threshold)
        .apply(&input)
        .map_err(to_js_err)?;
    Ok(output.into_vec())
}

/// Run a comma separated chain of filters, e.g. "blur,sobel".
#[wasm_bindgen]
pub fn run_pipeline_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    filters: &str,
) -> Result<Vec<u8>, JsValue> {
    let input = input_buffer(data, width, height)?;
    let pipeline = PipelineConfig::parse_list(filters).map_err(to_js_err)?.build();
    let output = pipeline.run(input).map_err(to_js_err)?;
    Ok(output.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_edge() -> Vec<u8> {
        // 4x4, left half 0, right half 20: Sobel magnitude 40 at the edge.
        [0u8, 0, 20, 20].repeat(4)
    }

    #[test]
    fn test_apply_filter_threshold_override() {
        let data = step_edge();
        let default = apply_filter_wasm(&data, 4, 4, "sobel", None).unwrap();
        assert!(default.iter().all(|&v| v == 0));

        let relaxed = apply_filter_wasm(&data, 4, 4, "sobel", Some(0)).unwrap();
        assert_eq!(relaxed[2], 40);
    }
}
