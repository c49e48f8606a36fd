//! One pass over the batch source

use super::core::{build_context, Trainer};
use super::result::EpochSummary;
use crate::data::BatchSource;
use crate::models::Mode;
use crate::train::callback::CallbackAction;
use crate::train::step::StepResult;
use crate::Result;

impl Trainer {
    /// Train for one epoch
    ///
    /// Resets the running metrics, puts both networks in training mode and
    /// runs the optimization step on every batch, except the first one when
    /// `skip_first_batch` is set. The generator is left in evaluation mode.
    pub fn train_epoch(&mut self, epoch: usize, source: &mut dyn BatchSource) -> Result<EpochSummary> {
        self.session.metrics.reset();
        self.session.train_mode();

        let steps_per_epoch = source.num_batches();
        let mut steps = 0;
        let mut skipped = 0;
        let mut stopped = false;

        for (index, batch) in source.epoch_batches().enumerate() {
            let batch = batch?;
            if index == 0 && self.config.skip_first_batch {
                tracing::debug!("Epoch {epoch}: skipping first batch");
                continue;
            }

            let outcome = match self.session.optimization_step(&batch)? {
                StepResult::Applied(outcome) => outcome,
                StepResult::Skipped { .. } => {
                    skipped += 1;
                    continue;
                }
            };

            let weight = self
                .config
                .metric_weighting
                .weight(self.config.batch_size, outcome.samples);
            self.session.metrics.accumulate(&outcome, weight);
            steps += 1;
            self.global_step += 1;

            let ctx = build_context(
                &self.session,
                &self.config,
                (epoch, index + 1, steps_per_epoch),
                self.global_step,
                self.start_time,
                Some(outcome),
            );
            match self.callbacks.on_step_end(&ctx)? {
                CallbackAction::Continue => {}
                CallbackAction::SkipEpoch => break,
                CallbackAction::Stop => {
                    stopped = true;
                    break;
                }
            }
        }

        self.session.generator.set_mode(Mode::Eval);

        Ok(EpochSummary {
            epoch,
            steps,
            skipped,
            metrics: self.session.metrics.normalized(),
            stopped,
        })
    }
}
