//! Validation error types

/// Validation error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Data directory does not exist: {0}")]
    DataDirNotFound(String),

    #[error("File list does not exist: {0}")]
    FileListNotFound(String),

    #[error("VGG16 weights do not exist: {0}")]
    VggWeightsNotFound(String),

    #[error("Invalid upscale factor: {0} (must be > 0)")]
    InvalidUpscale(usize),

    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid frame window: {0} (must be >= 2)")]
    InvalidFrameCount(usize),

    #[error("Invalid frame window: {0} (a centered window needs an odd frame count)")]
    EvenCenteredWindow(usize),

    #[error("Invalid learning rate: {0} (must be > 0.0 and <= 1.0)")]
    InvalidLearningRate(f64),

    #[error("Invalid Adam beta: {0} (must be in [0.0, 1.0))")]
    InvalidBeta(f64),

    #[error("Invalid Adam epsilon: {0} (must be > 0.0)")]
    InvalidEpsilon(f64),

    #[error("Invalid epochs: {0} (must be > 0)")]
    InvalidEpochs(usize),

    #[error("Invalid start epoch: {start} (must be in 1..={n_epochs})")]
    InvalidStartEpoch { start: usize, n_epochs: usize },

    #[error("Invalid snapshot cadence: {0} (must be > 0)")]
    InvalidSnapshots(usize),

    #[error("Invalid thread count: {0} (must be > 0)")]
    InvalidThreads(usize),

    #[error("Invalid network width: {name} = {value} (must be > 0)")]
    InvalidWidth { name: &'static str, value: usize },

    #[error("Report prefix cannot be empty")]
    EmptyPrefix,
}
