//! Core traits and types for the callback system
//!
//! - `CallbackContext` - state passed to callbacks
//! - `CallbackAction` - actions a callback can request
//! - `TrainerCallback` - the trait all callbacks implement

use candle_nn::VarMap;

use crate::train::metrics::EpochMetrics;
use crate::train::step::StepOutcome;
use crate::Result;

/// Context passed to callbacks with current training state
#[derive(Clone, Default)]
pub struct CallbackContext<'a> {
    /// Current epoch (1-based)
    pub epoch: usize,
    /// Last epoch of the run
    pub max_epochs: usize,
    /// Current step within the epoch
    pub step: usize,
    /// Batches in the epoch
    pub steps_per_epoch: usize,
    /// Optimization steps applied since the run started
    pub global_step: usize,
    /// Outcome of the step that just finished, if any
    pub outcome: Option<StepOutcome>,
    /// Normalized running metrics of the current epoch
    pub metrics: EpochMetrics,
    /// Generator learning rate
    pub lr_g: f64,
    /// Discriminator learning rate
    pub lr_d: f64,
    /// Training duration in seconds
    pub elapsed_secs: f64,
    /// Generator parameters
    pub generator: Option<&'a VarMap>,
    /// Discriminator parameters
    pub discriminator: Option<&'a VarMap>,
}

impl std::fmt::Debug for CallbackContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let var_count = |vars: Option<&VarMap>| vars.map(|v| v.all_vars().len());
        f.debug_struct("CallbackContext")
            .field("epoch", &self.epoch)
            .field("max_epochs", &self.max_epochs)
            .field("step", &self.step)
            .field("steps_per_epoch", &self.steps_per_epoch)
            .field("global_step", &self.global_step)
            .field("outcome", &self.outcome)
            .field("metrics", &self.metrics)
            .field("lr_g", &self.lr_g)
            .field("lr_d", &self.lr_d)
            .field("elapsed_secs", &self.elapsed_secs)
            .field("generator_vars", &var_count(self.generator))
            .field("discriminator_vars", &var_count(self.discriminator))
            .finish()
    }
}

/// Action to take after a callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    /// Continue training normally
    Continue,
    /// Stop training
    Stop,
    /// Skip the rest of the current epoch
    SkipEpoch,
}

/// Trait for training callbacks
///
/// All methods have default no-op implementations. Hooks are fallible so
/// that persistence failures abort the run.
pub trait TrainerCallback: Send {
    /// Called before training starts
    fn on_train_begin(&mut self, _ctx: &CallbackContext) -> Result<CallbackAction> {
        Ok(CallbackAction::Continue)
    }

    /// Called after training ends
    fn on_train_end(&mut self, _ctx: &CallbackContext) -> Result<()> {
        Ok(())
    }

    /// Called before each epoch
    fn on_epoch_begin(&mut self, _ctx: &CallbackContext) -> Result<CallbackAction> {
        Ok(CallbackAction::Continue)
    }

    /// Called after each epoch, once learning-rate decay has been applied
    fn on_epoch_end(&mut self, _ctx: &CallbackContext) -> Result<CallbackAction> {
        Ok(CallbackAction::Continue)
    }

    /// Called after each optimization step
    fn on_step_end(&mut self, _ctx: &CallbackContext) -> Result<CallbackAction> {
        Ok(CallbackAction::Continue)
    }

    /// Get callback name for logging
    fn name(&self) -> &'static str {
        "TrainerCallback"
    }
}
