//! Checkpoint and report callback

use std::path::PathBuf;

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use crate::io::{checkpoint_path, report_path, save_checkpoint, EpochReport, NetKind};
use crate::{Error, Result};

/// Saves both networks on the snapshot cadence and keeps the epoch report
///
/// An epoch is a snapshot epoch when `(epoch + 1)` is a multiple of
/// `snapshots`. Its metrics are appended to the report, which is rewritten
/// to disk once it holds at least two rows.
#[derive(Clone, Debug)]
pub struct CheckpointCallback {
    save_folder: PathBuf,
    statistics_dir: PathBuf,
    prefix: String,
    upscale: usize,
    snapshots: usize,
    report: EpochReport,
    pub(crate) last_saved_epoch: Option<usize>,
}

impl CheckpointCallback {
    /// Checkpoint callback saving into `save_folder` after every epoch
    pub fn new(save_folder: impl Into<PathBuf>, upscale: usize) -> Self {
        Self {
            save_folder: save_folder.into(),
            statistics_dir: PathBuf::from("statistics"),
            prefix: "nitidez".to_string(),
            upscale,
            snapshots: 1,
            report: EpochReport::new(),
            last_saved_epoch: None,
        }
    }

    /// Save every `snapshots` epochs (values below 1 are treated as 1)
    pub fn snapshots(mut self, snapshots: usize) -> Self {
        self.snapshots = snapshots.max(1);
        self
    }

    /// Directory and file prefix of the CSV report
    pub fn report_to(mut self, statistics_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        self.statistics_dir = statistics_dir.into();
        self.prefix = prefix.into();
        self
    }

    /// Whether `epoch` falls on the snapshot cadence
    pub fn is_snapshot_epoch(&self, epoch: usize) -> bool {
        (epoch + 1).is_multiple_of(self.snapshots)
    }

    /// Path of the generator checkpoint for `epoch`
    pub fn generator_path(&self, epoch: usize) -> PathBuf {
        checkpoint_path(&self.save_folder, NetKind::Generator, self.upscale, epoch)
    }

    /// Path of the discriminator checkpoint for `epoch`
    pub fn discriminator_path(&self, epoch: usize) -> PathBuf {
        checkpoint_path(&self.save_folder, NetKind::Discriminator, self.upscale, epoch)
    }

    /// Path of the CSV report
    pub fn report_path(&self) -> PathBuf {
        report_path(&self.statistics_dir, &self.prefix, self.upscale)
    }

    /// Report rows recorded so far
    pub fn report(&self) -> &EpochReport {
        &self.report
    }
}

impl TrainerCallback for CheckpointCallback {
    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> Result<CallbackAction> {
        if !self.is_snapshot_epoch(ctx.epoch) {
            return Ok(CallbackAction::Continue);
        }

        let (generator, discriminator) = match (ctx.generator, ctx.discriminator) {
            (Some(g), Some(d)) => (g, d),
            _ => {
                return Err(Error::ConfigError(
                    "checkpoint requested without access to model parameters".to_string(),
                ))
            }
        };

        let g_path = self.generator_path(ctx.epoch);
        save_checkpoint(generator, &g_path)?;
        save_checkpoint(discriminator, &self.discriminator_path(ctx.epoch))?;
        tracing::info!("Checkpoint saved to {}", g_path.display());
        self.last_saved_epoch = Some(ctx.epoch);

        self.report.push(ctx.epoch, &ctx.metrics);
        if self.report.len() >= 2 {
            let path = self.report_path();
            self.report.write_csv(&path)?;
            tracing::debug!("Report with {} rows written to {}", self.report.len(), path.display());
        }
        Ok(CallbackAction::Continue)
    }

    fn name(&self) -> &'static str {
        "CheckpointCallback"
    }
}
