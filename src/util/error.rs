//! Error types for gridyolo.

use thiserror::Error;

/// Result alias for gridyolo operations.
pub type Result<T> = std::result::Result<T, GridYoloError>;

/// Errors that can occur while interpreting detector output.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GridYoloError {
    /// The raw network output does not match the configured grid layout.
    #[error("raw output size mismatch: expected {expected} values, got {got}")]
    OutputSizeMismatch { expected: usize, got: usize },
    /// The input tensor does not match `1 x image_size x image_size x 3`.
    #[error("input tensor size mismatch: expected {expected} values, got {got}")]
    InputSizeMismatch { expected: usize, got: usize },
    /// Decoded boxes were produced from a different grid layout.
    #[error("decoded boxes do not share the raw output's grid layout")]
    LayoutMismatch,
    /// A configuration field holds an unusable value.
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    /// The original image dimensions cannot be used for rescaling.
    #[error("invalid image size {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },
    /// The inference backend failed to produce an output vector.
    #[error("inference failed: {reason}")]
    Inference { reason: String },
}
