//! Optimizers and learning-rate schedule
//!
//! Both networks use Adam (`beta1 = 0.9`, `beta2 = 0.999`, `eps = 1e-8`,
//! no weight decay) from `candle-nn`; only the generator rate is decayed.

mod scheduler;

pub use scheduler::HalfRunDecay;

use candle_nn::{AdamW, Optimizer, ParamsAdamW, VarMap};

use crate::Result;

/// Adam hyperparameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdamConfig {
    /// Learning rate
    pub lr: f64,
    /// First moment decay
    pub beta1: f64,
    /// Second moment decay
    pub beta2: f64,
    /// Numerical stability term
    pub eps: f64,
}

impl AdamConfig {
    /// Default moments with the given learning rate
    pub fn with_lr(lr: f64) -> Self {
        Self {
            lr,
            ..Self::default()
        }
    }
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            lr: 1e-4,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
        }
    }
}

/// Adam over every variable of a parameter store
///
/// Variables added to the store afterwards are not tracked.
pub fn adam(vars: &VarMap, config: AdamConfig) -> Result<AdamW> {
    let params = ParamsAdamW {
        lr: config.lr,
        beta1: config.beta1,
        beta2: config.beta2,
        eps: config.eps,
        weight_decay: 0.0,
    };
    Ok(AdamW::new(vars.all_vars(), params)?)
}
