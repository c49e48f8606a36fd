//! One adversarial optimization step

use std::fmt;

use candle_nn::Optimizer;
use serde::{Deserialize, Serialize};

use super::session::TrainingSession;
use crate::compute::scalar;
use crate::data::FrameBatch;
use crate::{Error, Result};

/// Half of an optimization step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Discriminator update
    Discriminator,
    /// Generator update
    Generator,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Discriminator => write!(f, "discriminator"),
            Phase::Generator => write!(f, "generator"),
        }
    }
}

/// What to do when a loss is NaN or infinite
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonFinitePolicy {
    /// Fail the run with [`Error::NonFiniteLoss`]
    #[default]
    Abort,
    /// Log a warning and drop the rest of the batch
    Skip,
}

/// Losses and scores of one applied step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    /// Discriminator loss, already divided by the batch cardinality
    pub d_loss: f32,
    /// Generator loss, already divided by the batch cardinality
    pub g_loss: f32,
    /// Mean discriminator score on real frames
    pub real_score: f32,
    /// Mean discriminator score on synthesized frames
    pub fake_score: f32,
    /// Samples in the batch
    pub samples: usize,
}

/// Result of [`TrainingSession::optimization_step`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepResult {
    /// Both updates were applied
    Applied(StepOutcome),
    /// A non-finite loss was found and the policy is [`NonFinitePolicy::Skip`]
    ///
    /// A skip in the generator phase happens after the discriminator update.
    Skipped {
        /// Phase whose loss was not finite
        phase: Phase,
        /// Offending value
        value: f32,
    },
}

impl TrainingSession {
    /// Run one discriminator update followed by one generator update
    ///
    /// The synthesized frames and their discriminator scores from the first
    /// phase are reused by the generator loss, so the graph built in the
    /// discriminator phase stays alive until the generator backward pass.
    /// Each optimizer only updates the variables of its own network, which
    /// discards cross-network gradients.
    pub fn optimization_step(&mut self, batch: &FrameBatch) -> Result<StepResult> {
        batch.validate(self.config.neighbors)?;
        let batch = batch.to_compute(&self.compute)?;
        let samples = batch.len()?;
        let cardinality = samples as f64;

        let mut fake = self
            .generator
            .forward(&batch.input, &batch.neighbors, &batch.flows)?;
        if self.config.residual {
            fake = (fake + &batch.bicubic)?;
        }

        let real_out = self.discriminator.score(&batch.target)?.mean_all()?;
        let fake_scores = self.discriminator.score(&fake)?;
        let fake_out = fake_scores.mean_all()?;

        let d_loss = ((real_out.affine(-1.0, 1.0)? + &fake_out)? / cardinality)?;
        let d_value = scalar(&d_loss)?;
        if let Some(skipped) = self.guard(Phase::Discriminator, d_value)? {
            return Ok(skipped);
        }
        let d_grads = d_loss.backward()?;
        self.optimizer_d.step(&d_grads)?;

        let g_loss = (self.loss.compute(&fake, &fake_scores, &batch.target)? / cardinality)?;
        let g_value = scalar(&g_loss)?;
        if let Some(skipped) = self.guard(Phase::Generator, g_value)? {
            return Ok(skipped);
        }
        let g_grads = g_loss.backward()?;
        self.optimizer_g.step(&g_grads)?;

        Ok(StepResult::Applied(StepOutcome {
            d_loss: d_value,
            g_loss: g_value,
            real_score: scalar(&real_out)?,
            fake_score: scalar(&fake_out)?,
            samples,
        }))
    }

    fn guard(&self, phase: Phase, value: f32) -> Result<Option<StepResult>> {
        if value.is_finite() {
            return Ok(None);
        }
        match self.config.non_finite {
            NonFinitePolicy::Abort => Err(Error::NonFiniteLoss { phase, value }),
            NonFinitePolicy::Skip => {
                tracing::warn!("Skipping batch: non-finite {phase} loss ({value})");
                Ok(Some(StepResult::Skipped { phase, value }))
            }
        }
    }
}
