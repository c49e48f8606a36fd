//! Epoch report table

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::train::EpochMetrics;
use crate::Result;

/// One row of the report
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Epoch the metrics belong to
    #[serde(rename = "Epoch")]
    pub epoch: usize,
    /// Mean discriminator loss
    #[serde(rename = "DLoss")]
    pub d_loss: f64,
    /// Mean generator loss
    #[serde(rename = "GLoss")]
    pub g_loss: f64,
    /// Mean D(x)
    #[serde(rename = "DScore")]
    pub d_score: f64,
    /// Mean D(G(z))
    #[serde(rename = "GScore")]
    pub g_score: f64,
}

/// `<statistics_dir>/<prefix>_<upscale>x_train_results.csv`
pub fn report_path(statistics_dir: &Path, prefix: &str, upscale: usize) -> PathBuf {
    statistics_dir.join(format!("{prefix}_{upscale}x_train_results.csv"))
}

/// Append-only in-memory table of per-epoch metrics
#[derive(Clone, Debug, Default)]
pub struct EpochReport {
    rows: Vec<ReportRow>,
}

impl EpochReport {
    /// Empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the normalized metrics of `epoch`
    pub fn push(&mut self, epoch: usize, metrics: &EpochMetrics) {
        self.rows.push(ReportRow {
            epoch,
            d_loss: metrics.d_loss,
            g_loss: metrics.g_loss,
            d_score: metrics.d_score,
            g_score: metrics.g_score,
        });
    }

    /// Recorded rows in epoch order
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Number of recorded epochs
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing was recorded yet
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rewrite the whole table to `path`
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
