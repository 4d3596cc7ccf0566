//! Error type shared by every stage of the engine.
//!
//! All errors describe malformed input data. None of them are transient,
//! so nothing in the crate retries.

use thiserror::Error;

/// Errors produced while building buffers or running filters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid dimensions {rows}x{cols}: {reason}")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        reason: &'static str,
    },
    #[error("input has no rows or no columns")]
    EmptyInput,
    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedInput {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("index ({row}, {col}) is outside a {rows}x{cols} buffer")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("unsupported channel layout: {0}")]
    UnsupportedChannelLayout(String),
    #[error("dimension mismatch: {left_rows}x{left_cols} vs {right_rows}x{right_cols}")]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },
    #[error("unknown filter '{0}' (expected blur, sobel or scharr)")]
    UnknownFilter(String),
    #[error("invalid pipeline configuration: {0}")]
    Config(String),
    #[error("stage {index} ({filter}) failed: {source}")]
    Stage {
        index: usize,
        filter: &'static str,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
