//! Adversarial training loop
//!
//! This module provides the training machinery:
//! - [`TrainingSession`] - both networks, both optimizers, loss strategy and metrics
//! - Optimization step (one discriminator update, then one generator update)
//! - Loss strategies (composite adversarial/perceptual or plain L1)
//! - Per-epoch metric accumulation
//! - [`Trainer`] - epoch loop with learning-rate decay and callbacks
//!
//! # Example
//!
//! ```no_run
//! use nitidez::config::{build_session, TrainSpec};
//! use nitidez::data::VecSource;
//! use nitidez::train::{ProgressCallback, Trainer};
//! use nitidez::ComputeContext;
//!
//! let spec = TrainSpec::default();
//! let session = build_session(&spec, ComputeContext::cpu())?;
//! let mut trainer = Trainer::new(session, spec.loop_config());
//! trainer.add_callback(ProgressCallback::new(true));
//!
//! let mut batches = VecSource::new(vec![]);
//! let result = trainer.train(&mut batches)?;
//! println!("{} steps", result.steps);
//! # Ok::<(), nitidez::Error>(())
//! ```

pub mod callback;
mod config;
mod loss;
mod metrics;
mod session;
mod step;
mod trainer;

#[cfg(test)]
pub(crate) mod test_utils;

pub use callback::{
    CallbackAction, CallbackContext, CallbackManager, CheckpointCallback, ProgressCallback,
    TrainerCallback,
};
pub use config::LoopConfig;
pub use loss::{tv_loss, CompositeLoss, CompositeWeights, LossStrategy, ReconstructionLoss};
pub use metrics::{EpochMetrics, MetricWeighting, RunningMetrics};
pub use session::{StepConfig, TrainingSession};
pub use step::{NonFinitePolicy, Phase, StepOutcome, StepResult};
pub use trainer::{EpochSummary, TrainResult, Trainer};
