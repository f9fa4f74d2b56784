//! Error types for the freeze engine and its host adapter

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the engine, transform and processor
#[derive(Debug, Error)]
pub enum FreezeError {
    /// Caller handed over a buffer of the wrong shape
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A write would overflow fixed-capacity storage
    #[error("capacity exceeded: {requested} frames requested, {available} available")]
    CapacityExceeded { requested: usize, available: usize },

    /// Impossible engine geometry (channels, fft size, overlap)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The underlying FFT rejected its buffers
    #[error("transform failed: {0}")]
    Transform(String),

    /// Plan cache could not be read or does not match this transform
    #[error("plan cache {path}: {reason}")]
    PlanCache { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<realfft::FftError> for FreezeError {
    fn from(err: realfft::FftError) -> Self {
        FreezeError::Transform(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FreezeError>;
