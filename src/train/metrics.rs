//! Running metric accumulation for one epoch

use serde::{Deserialize, Serialize};

use super::step::StepOutcome;

/// Which sample count weights each batch's contribution
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricWeighting {
    /// Weight every batch by the configured batch size, even a short final batch
    #[default]
    Configured,
    /// Weight every batch by the number of samples it actually holds
    Actual,
}

impl MetricWeighting {
    /// Weight for a batch of `actual` samples under a configured `batch_size`
    pub fn weight(self, batch_size: usize, actual: usize) -> usize {
        match self {
            MetricWeighting::Configured => batch_size,
            MetricWeighting::Actual => actual,
        }
    }
}

/// Average values for one epoch
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Mean discriminator loss
    #[serde(rename = "DLoss")]
    pub d_loss: f64,
    /// Mean generator loss
    #[serde(rename = "GLoss")]
    pub g_loss: f64,
    /// Mean discriminator score on real frames, D(x)
    #[serde(rename = "DScore")]
    pub d_score: f64,
    /// Mean discriminator score on synthesized frames, D(G(z))
    #[serde(rename = "GScore")]
    pub g_score: f64,
}

/// Sums of weighted per-batch values, reset at the start of every epoch
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunningMetrics {
    /// Accumulated sample weight
    pub batch_size: usize,
    /// Weighted discriminator loss sum
    pub d_loss: f64,
    /// Weighted generator loss sum
    pub g_loss: f64,
    /// Weighted real-score sum
    pub d_score: f64,
    /// Weighted fake-score sum
    pub g_score: f64,
}

impl RunningMetrics {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every sum
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold one batch in, scaling each value by `weight`
    pub fn accumulate(&mut self, outcome: &StepOutcome, weight: usize) {
        let w = weight as f64;
        self.batch_size += weight;
        self.d_loss += f64::from(outcome.d_loss) * w;
        self.g_loss += f64::from(outcome.g_loss) * w;
        self.d_score += f64::from(outcome.real_score) * w;
        self.g_score += f64::from(outcome.fake_score) * w;
    }

    /// Whether anything has been accumulated since the last reset
    pub fn is_empty(&self) -> bool {
        self.batch_size == 0
    }

    /// Sums divided by accumulated weight (all zero when empty)
    pub fn normalized(&self) -> EpochMetrics {
        EpochMetrics {
            d_loss: safe_avg(self.d_loss, self.batch_size),
            g_loss: safe_avg(self.g_loss, self.batch_size),
            d_score: safe_avg(self.d_score, self.batch_size),
            g_score: safe_avg(self.g_score, self.batch_size),
        }
    }
}

fn safe_avg(total: f64, count: usize) -> f64 {
    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn outcome(d: f32, g: f32, real: f32, fake: f32) -> StepOutcome {
        StepOutcome {
            d_loss: d,
            g_loss: g,
            real_score: real,
            fake_score: fake,
            samples: 2,
        }
    }

    #[test]
    fn test_normalization() {
        let mut m = RunningMetrics::new();
        m.accumulate(&outcome(2.0, 4.0, 0.0, 0.0), 2);
        m.accumulate(&outcome(0.0, 0.0, 0.0, 0.0), 2);
        assert_eq!(m.batch_size, 4);
        assert_relative_eq!(m.d_loss, 4.0);
        assert_relative_eq!(m.g_loss, 8.0);

        let n = m.normalized();
        assert_relative_eq!(n.d_loss, 1.0);
        assert_relative_eq!(n.g_loss, 2.0);
    }

    #[test]
    fn test_empty_normalizes_to_zero() {
        let m = RunningMetrics::new();
        assert!(m.is_empty());
        assert_eq!(m.normalized(), EpochMetrics::default());
    }

    #[test]
    fn test_reset() {
        let mut m = RunningMetrics::new();
        m.accumulate(&outcome(1.0, 1.0, 0.9, 0.1), 2);
        m.reset();
        assert!(m.is_empty());
        assert_eq!(m.d_score, 0.0);
    }

    #[test]
    fn test_weighting_modes() {
        assert_eq!(MetricWeighting::Configured.weight(4, 1), 4);
        assert_eq!(MetricWeighting::Actual.weight(4, 1), 1);
    }

    #[test]
    fn test_epoch_metrics_column_names() {
        let json = serde_json::to_string(&EpochMetrics::default()).unwrap();
        for col in ["DLoss", "GLoss", "DScore", "GScore"] {
            assert!(json.contains(col));
        }
    }

    proptest! {
        #[test]
        fn prop_constant_values_normalize_to_themselves(
            value in -10.0f32..10.0,
            weights in prop::collection::vec(1usize..16, 1..20),
        ) {
            let mut m = RunningMetrics::new();
            for w in &weights {
                m.accumulate(&outcome(value, value, value, value), *w);
            }
            let n = m.normalized();
            prop_assert!((n.d_loss - f64::from(value)).abs() < 1e-4);
            prop_assert!((n.g_score - f64::from(value)).abs() < 1e-4);
            prop_assert_eq!(m.batch_size, weights.iter().sum::<usize>());
        }
    }
}
