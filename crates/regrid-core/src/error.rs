//! Error types for grid, transform, interpolation and resampling operations.
//!
//! Construction-time invariant violations surface immediately through these
//! variants. Per-sample `OutOfBounds` conditions raised while resampling are
//! absorbed by the resampler and never escape a `resample` call.

use thiserror::Error;

/// Main error type for regrid operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegridError {
    /// Bad spacing or direction when building a grid.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Direct indexed access outside the image buffer.
    #[error("Index {index:?} out of range for image of size {size:?}")]
    IndexOutOfRange { index: Vec<i64>, size: Vec<usize> },

    /// Interpolation query outside the valid support under the strict policy.
    #[error("Continuous index {index:?} is outside the interpolation support")]
    OutOfBounds { index: Vec<f64> },

    /// Transform has no inverse available.
    #[error("Transform is not invertible: {0}")]
    NotInvertible(String),

    /// Linear part of a transform is singular.
    #[error("Singular linear transform (determinant {determinant:e})")]
    Singular { determinant: f64 },

    /// Transform parameters violate their own invariants.
    #[error("Invalid transform: {0}")]
    InvalidTransform(String),

    /// Pixel component count mismatch.
    #[error("Component mismatch: expected {expected}, got {actual}")]
    ComponentMismatch { expected: usize, actual: usize },

    /// Buffer length does not match size times components.
    #[error("Buffer size mismatch: expected {expected} elements, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Conversion to or from a tensor failed.
    #[error("Tensor conversion error: {0}")]
    Tensor(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Resampling was cancelled through its cancellation token.
    #[error("Resampling cancelled")]
    Cancelled,
}

/// Result type for regrid operations.
pub type Result<T> = std::result::Result<T, RegridError>;

impl RegridError {
    /// Create an invalid grid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }

    /// Create a not-invertible error.
    pub fn not_invertible(msg: impl Into<String>) -> Self {
        Self::NotInvertible(msg.into())
    }

    /// Create an invalid transform error.
    pub fn invalid_transform(msg: impl Into<String>) -> Self {
        Self::InvalidTransform(msg.into())
    }

    /// Create a tensor conversion error.
    pub fn tensor(msg: impl Into<String>) -> Self {
        Self::Tensor(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create an index-out-of-range error from a signed index and image size.
    pub fn index_out_of_range<const D: usize>(index: [i64; D], size: [usize; D]) -> Self {
        Self::IndexOutOfRange {
            index: index.to_vec(),
            size: size.to_vec(),
        }
    }

    /// Create an out-of-bounds error from a continuous index.
    pub fn out_of_bounds(index: &[f64]) -> Self {
        Self::OutOfBounds {
            index: index.to_vec(),
        }
    }

    /// Whether this error is a per-sample out-of-bounds signal.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}
