//! Error types for the GNSS navigation data library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for navigation data operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when loading, indexing or exporting navigation data.
#[derive(Debug, Error)]
pub enum Error {
    /// The input path does not reference an existing file
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The input is not something a store can be built from (empty path, directory, ...)
    #[error("Unsupported input type: {0}")]
    UnsupportedInputType(String),

    /// A row name that is not present in the store
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A categorical code that was never assigned by the codec
    #[error("Unknown code {code} for field '{field}'")]
    UnknownCode { field: String, code: f64 },

    /// Value length disagrees with the number of target columns or rows
    #[error("Shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Malformed key shape or type
    #[error("Invalid key: {0}")]
    InvalidKeySpec(String),

    /// Text written into a numeric row, or numbers into a categorical row
    #[error("Representation mismatch for field '{field}': {reason}")]
    RepresentationMismatch { field: String, reason: String },

    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error while reading CSV or assembling record batches
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Output format error (e.g., Parquet write error)
    #[error("Output error: {0}")]
    OutputError(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<parquet::errors::ParquetError> for Error {
    fn from(err: parquet::errors::ParquetError) -> Self {
        Error::OutputError(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
