//! Training session: every piece of mutable training state in one place

use candle_nn::{AdamW, Optimizer};

use super::loss::LossStrategy;
use super::metrics::RunningMetrics;
use super::step::NonFinitePolicy;
use crate::compute::ComputeContext;
use crate::models::{Critic, Mode, SuperResolver};
use crate::optim::{adam, AdamConfig};
use crate::Result;

/// Per-step behavior fixed for the whole run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepConfig {
    /// Add the bicubic reference to the generator output before scoring
    pub residual: bool,
    /// Neighbor frames every batch must carry
    pub neighbors: usize,
    /// Reaction to NaN or infinite losses
    pub non_finite: NonFinitePolicy,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            residual: false,
            neighbors: 6,
            non_finite: NonFinitePolicy::Abort,
        }
    }
}

/// Owns both networks, both optimizers, the loss strategy, the compute
/// context and the running metrics of the current epoch
pub struct TrainingSession {
    pub(crate) generator: Box<dyn SuperResolver>,
    pub(crate) discriminator: Box<dyn Critic>,
    pub(crate) optimizer_g: AdamW,
    pub(crate) optimizer_d: AdamW,
    pub(crate) loss: Box<dyn LossStrategy>,
    pub(crate) compute: ComputeContext,
    pub(crate) config: StepConfig,
    pub(crate) metrics: RunningMetrics,
}

impl TrainingSession {
    /// Build a session, creating one Adam optimizer per network
    ///
    /// Both optimizers start from the same hyperparameters. Any pretrained
    /// generator state must be loaded before this call or written in place
    /// through the generator's parameter store.
    pub fn new(
        generator: Box<dyn SuperResolver>,
        discriminator: Box<dyn Critic>,
        loss: Box<dyn LossStrategy>,
        compute: ComputeContext,
        optimizer: AdamConfig,
        config: StepConfig,
    ) -> Result<Self> {
        let optimizer_g = adam(generator.vars(), optimizer)?;
        let optimizer_d = adam(discriminator.vars(), optimizer)?;
        Ok(Self {
            generator,
            discriminator,
            optimizer_g,
            optimizer_d,
            loss,
            compute,
            config,
            metrics: RunningMetrics::new(),
        })
    }

    /// Generator network
    pub fn generator(&self) -> &dyn SuperResolver {
        self.generator.as_ref()
    }

    /// Discriminator network
    pub fn discriminator(&self) -> &dyn Critic {
        self.discriminator.as_ref()
    }

    /// Active loss strategy
    pub fn loss(&self) -> &dyn LossStrategy {
        self.loss.as_ref()
    }

    /// Compute context every batch is moved into
    pub fn compute(&self) -> &ComputeContext {
        &self.compute
    }

    /// Per-step configuration
    pub fn step_config(&self) -> &StepConfig {
        &self.config
    }

    /// Running metrics of the current epoch
    pub fn metrics(&self) -> &RunningMetrics {
        &self.metrics
    }

    /// Generator learning rate
    pub fn lr_g(&self) -> f64 {
        self.optimizer_g.learning_rate()
    }

    /// Discriminator learning rate
    pub fn lr_d(&self) -> f64 {
        self.optimizer_d.learning_rate()
    }

    /// Put both networks into training mode
    pub fn train_mode(&mut self) {
        self.generator.set_mode(Mode::Train);
        self.discriminator.set_mode(Mode::Train);
    }
}
