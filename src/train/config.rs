//! Epoch loop configuration

use super::metrics::MetricWeighting;

/// Range and batching policy of the epoch loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopConfig {
    /// First epoch (1-based, inclusive)
    pub start_epoch: usize,
    /// Last epoch (inclusive)
    pub n_epochs: usize,
    /// Configured samples per batch
    pub batch_size: usize,
    /// Drop the first batch of every epoch without training on it
    pub skip_first_batch: bool,
    /// How batches are weighted in the running metrics
    pub metric_weighting: MetricWeighting,
}

impl LoopConfig {
    /// Number of epochs the loop will run
    pub fn epochs_planned(&self) -> usize {
        (self.n_epochs + 1).saturating_sub(self.start_epoch.max(1))
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            start_epoch: 1,
            n_epochs: 150,
            batch_size: 2,
            skip_first_batch: true,
            metric_weighting: MetricWeighting::Configured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epochs_planned() {
        let config = LoopConfig::default();
        assert_eq!(config.epochs_planned(), 150);

        let resumed = LoopConfig {
            start_epoch: 101,
            ..LoopConfig::default()
        };
        assert_eq!(resumed.epochs_planned(), 50);
    }

    #[test]
    fn test_start_past_end_plans_nothing() {
        let config = LoopConfig {
            start_epoch: 10,
            n_epochs: 5,
            ..LoopConfig::default()
        };
        assert_eq!(config.epochs_planned(), 0);
    }
}
