//! Core Trainer struct and basic methods

use std::time::Instant;

use crate::optim::HalfRunDecay;
use crate::train::callback::{CallbackContext, CallbackManager, TrainerCallback};
use crate::train::step::StepOutcome;
use crate::train::{LoopConfig, TrainingSession};

/// Drives a [`TrainingSession`] through the configured epoch range
pub struct Trainer {
    /// Networks, optimizers, loss and metrics
    pub(crate) session: TrainingSession,

    /// Epoch range and batching policy
    pub(crate) config: LoopConfig,

    /// Generator learning-rate decay
    pub(crate) scheduler: HalfRunDecay,

    /// Callback manager
    pub(crate) callbacks: CallbackManager,

    /// Optimization steps applied so far
    pub(crate) global_step: usize,

    /// Training start time
    pub(crate) start_time: Option<Instant>,
}

impl Trainer {
    /// Create a trainer with the half-run decay rule for `config.n_epochs`
    pub fn new(session: TrainingSession, config: LoopConfig) -> Self {
        Self {
            scheduler: HalfRunDecay::new(config.n_epochs),
            session,
            config,
            callbacks: CallbackManager::new(),
            global_step: 0,
            start_time: None,
        }
    }

    /// Add a callback to the trainer
    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    /// Loop configuration
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Underlying session
    pub fn session(&self) -> &TrainingSession {
        &self.session
    }

    /// Consume the trainer, returning the session
    pub fn into_session(self) -> TrainingSession {
        self.session
    }

    /// Get reference to callback manager
    pub fn callbacks(&self) -> &CallbackManager {
        &self.callbacks
    }
}

/// Snapshot of the loop state handed to callbacks
///
/// A free function so the context can borrow the session while the
/// callback manager is borrowed mutably.
pub(crate) fn build_context<'a>(
    session: &'a TrainingSession,
    config: &LoopConfig,
    position: (usize, usize, usize),
    global_step: usize,
    start_time: Option<Instant>,
    outcome: Option<StepOutcome>,
) -> CallbackContext<'a> {
    let (epoch, step, steps_per_epoch) = position;
    CallbackContext {
        epoch,
        max_epochs: config.n_epochs,
        step,
        steps_per_epoch,
        global_step,
        outcome,
        metrics: session.metrics().normalized(),
        lr_g: session.lr_g(),
        lr_d: session.lr_d(),
        elapsed_secs: start_time.map_or(0.0, |t| t.elapsed().as_secs_f64()),
        generator: Some(session.generator().vars()),
        discriminator: Some(session.discriminator().vars()),
    }
}
