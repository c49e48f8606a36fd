//! Learning-rate decay at every half of the run

use candle_nn::Optimizer;

/// Divides the learning rate by `factor` whenever `(epoch + 1)` is a
/// multiple of `n_epochs / 2`
///
/// The half-run length is real-valued: with an odd `n_epochs` it is
/// fractional and only exact multiples fire. For 150 epochs the rule fires
/// after epochs 74 and 149.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfRunDecay {
    n_epochs: usize,
    factor: f64,
}

impl HalfRunDecay {
    /// Decay by 10 every half of `n_epochs`
    pub fn new(n_epochs: usize) -> Self {
        Self {
            n_epochs,
            factor: 10.0,
        }
    }

    /// Override the division factor
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Whether the decay fires after `epoch`
    pub fn fires_at(&self, epoch: usize) -> bool {
        if self.n_epochs == 0 {
            return false;
        }
        let half = self.n_epochs as f64 / 2.0;
        let remainder = (epoch + 1) as f64 % half;
        remainder == 0.0
    }

    /// Apply the decay after `epoch`, returning the new rate when it fired
    pub fn apply<O: Optimizer>(&self, epoch: usize, optimizer: &mut O) -> Option<f64> {
        if !self.fires_at(epoch) {
            return None;
        }
        let lr = optimizer.learning_rate() / self.factor;
        optimizer.set_learning_rate(lr);
        Some(lr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::{adam, AdamConfig};
    use approx::assert_relative_eq;
    use candle_nn::VarMap;
    use proptest::prelude::*;

    #[test]
    fn test_fires_twice_over_150_epochs() {
        let decay = HalfRunDecay::new(150);
        let fired: Vec<usize> = (1..=150).filter(|e| decay.fires_at(*e)).collect();
        assert_eq!(fired, vec![74, 149]);
    }

    #[test]
    fn test_odd_run_uses_fractional_half() {
        // half = 2.5: only (epoch + 1) = 5 fires in 1..=5
        let decay = HalfRunDecay::new(5);
        let fired: Vec<usize> = (1..=5).filter(|e| decay.fires_at(*e)).collect();
        assert_eq!(fired, vec![4]);
    }

    #[test]
    fn test_zero_epochs_never_fires() {
        assert!(!HalfRunDecay::new(0).fires_at(0));
    }

    #[test]
    fn test_apply_divides_rate() {
        let vars = VarMap::new();
        let mut opt = adam(&vars, AdamConfig::with_lr(1e-4)).unwrap();
        let decay = HalfRunDecay::new(10);
        assert_eq!(decay.apply(3, &mut opt), None);
        let lr = decay.apply(4, &mut opt).unwrap();
        assert_relative_eq!(lr, 1e-5);
        assert_relative_eq!(opt.learning_rate(), 1e-5);
    }

    proptest! {
        #[test]
        fn prop_even_runs_fire_on_half_boundaries(half in 1usize..200, epoch in 0usize..1000) {
            let decay = HalfRunDecay::new(half * 2);
            prop_assert_eq!(decay.fires_at(epoch), (epoch + 1) % half == 0);
        }
    }
}
