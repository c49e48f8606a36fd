//! Training result types

use crate::train::EpochMetrics;

/// Outcome of one epoch
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSummary {
    /// Epoch number
    pub epoch: usize,
    /// Optimization steps applied
    pub steps: usize,
    /// Batches dropped by the non-finite policy
    pub skipped: usize,
    /// Normalized metrics
    pub metrics: EpochMetrics,
    /// Whether a callback asked to stop training
    pub stopped: bool,
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainResult {
    /// Epochs fully trained
    pub epochs_run: usize,
    /// Last epoch reached, if any ran
    pub final_epoch: Option<usize>,
    /// Metrics of the last epoch
    pub final_metrics: EpochMetrics,
    /// Optimization steps applied in total
    pub steps: usize,
    /// Batches dropped by the non-finite policy
    pub skipped_batches: usize,
    /// Final generator learning rate
    pub lr_g: f64,
    /// Final discriminator learning rate
    pub lr_d: f64,
    /// Whether a callback stopped training before the configured end
    pub stopped_early: bool,
    /// Total training time in seconds
    pub elapsed_secs: f64,
}
