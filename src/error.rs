//! Error types with actionable diagnostics.
//!
//! Configuration and I/O failures abort a run; numerical failures are
//! reported per batch and routed through [`crate::train::NonFinitePolicy`].

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ValidationError;
use crate::train::Phase;

/// Result type alias for nitidez operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or running a training session.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure inside the tensor backend (shape, dtype, device, autograd).
    #[error("Tensor backend error: {0}")]
    Tensor(#[from] candle_core::Error),

    /// A checkpoint file could not be parsed as safetensors.
    #[error("Invalid safetensors file: {0}\n  → The checkpoint may be truncated or written by another tool")]
    SafeTensors(#[from] safetensors::SafeTensorError),

    /// The epoch report could not be written.
    #[error("Report error: {0}")]
    Report(#[from] csv::Error),

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration parsed but failed validation.
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// Parameter state does not match the network it is loaded into.
    #[error("Checkpoint {path} does not match the model: {message}\n  → Check that upscale factor and frame window match the run that wrote it")]
    CheckpointMismatch { path: PathBuf, message: String },

    /// A dataset sample is missing or malformed.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// A batch violates the configured frame window.
    #[error("Malformed batch: {0}")]
    Batch(String),

    /// A loss evaluated to NaN or infinity.
    #[error("Non-finite {phase} loss ({value})\n  → Lower the learning rate or set `non_finite: skip` to drop such batches")]
    NonFiniteLoss { phase: Phase, value: f32 },
}
