//! Multi-epoch training loop

use std::time::Instant;

use super::core::{build_context, Trainer};
use super::result::TrainResult;
use crate::data::BatchSource;
use crate::train::callback::CallbackAction;
use crate::train::EpochMetrics;
use crate::Result;

impl Trainer {
    /// Train every epoch from `start_epoch` to `n_epochs` (inclusive)
    ///
    /// After each epoch the generator learning rate is decayed when the
    /// half-run rule fires, then `on_epoch_end` callbacks run (checkpoints
    /// and reports see the decayed rate). There is no early stopping besides
    /// a callback returning [`CallbackAction::Stop`].
    pub fn train(&mut self, source: &mut dyn BatchSource) -> Result<TrainResult> {
        let start = Instant::now();
        self.start_time = Some(start);
        let first = self.config.start_epoch.max(1);
        let last = self.config.n_epochs;

        tracing::info!(
            "Training epochs {first}..={last}, {} batches per epoch, loss: {}",
            source.num_batches(),
            self.session.loss().name()
        );

        let mut result = TrainResult {
            epochs_run: 0,
            final_epoch: None,
            final_metrics: EpochMetrics::default(),
            steps: 0,
            skipped_batches: 0,
            lr_g: self.session.lr_g(),
            lr_d: self.session.lr_d(),
            stopped_early: false,
            elapsed_secs: 0.0,
        };

        let ctx = build_context(
            &self.session,
            &self.config,
            (first, 0, source.num_batches()),
            self.global_step,
            self.start_time,
            None,
        );
        if self.callbacks.on_train_begin(&ctx)? == CallbackAction::Stop {
            result.stopped_early = true;
            return self.finalize(result, first);
        }

        for epoch in first..=last {
            let ctx = build_context(
                &self.session,
                &self.config,
                (epoch, 0, source.num_batches()),
                self.global_step,
                self.start_time,
                None,
            );
            match self.callbacks.on_epoch_begin(&ctx)? {
                CallbackAction::Stop => {
                    result.stopped_early = true;
                    break;
                }
                CallbackAction::SkipEpoch => continue,
                CallbackAction::Continue => {}
            }

            let summary = self.train_epoch(epoch, source)?;
            result.steps += summary.steps;
            result.skipped_batches += summary.skipped;
            result.final_metrics = summary.metrics;
            result.final_epoch = Some(epoch);
            if summary.stopped {
                result.stopped_early = true;
                break;
            }
            result.epochs_run += 1;

            if let Some(lr) = self.scheduler.apply(epoch, &mut self.session.optimizer_g) {
                tracing::info!("Learning rate decay: lr={lr}");
            }

            let ctx = build_context(
                &self.session,
                &self.config,
                (epoch, summary.steps, source.num_batches()),
                self.global_step,
                self.start_time,
                None,
            );
            if self.callbacks.on_epoch_end(&ctx)? == CallbackAction::Stop {
                result.stopped_early = true;
                break;
            }
        }

        let end = result.final_epoch.unwrap_or(first);
        self.finalize(result, end)
    }

    fn finalize(&mut self, mut result: TrainResult, epoch: usize) -> Result<TrainResult> {
        let ctx = build_context(
            &self.session,
            &self.config,
            (epoch, 0, 0),
            self.global_step,
            self.start_time,
            None,
        );
        self.callbacks.on_train_end(&ctx)?;

        result.lr_g = self.session.lr_g();
        result.lr_d = self.session.lr_d();
        result.elapsed_secs = self.start_time.map_or(0.0, |t| t.elapsed().as_secs_f64());
        tracing::info!(
            "Training finished: {} epochs, {} steps, {} skipped batches in {:.1}s",
            result.epochs_run,
            result.steps,
            result.skipped_batches,
            result.elapsed_secs
        );
        Ok(result)
    }
}
