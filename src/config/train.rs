//! Single-command training from a [`TrainSpec`]

use std::path::Path;

use super::builder::build_session;
use super::schema::TrainSpec;
use super::validate::{validate_config, validate_paths};
use crate::compute::ComputeContext;
use crate::data::PackedFrameDataset;
use crate::train::{CheckpointCallback, ProgressCallback, TrainResult, Trainer};
use crate::Result;

/// Train from a validated [`TrainSpec`]
///
/// This is the main entry point for declarative training. It:
/// 1. Validates the settings and input paths
/// 2. Resolves the compute device (falling back to CPU)
/// 3. Builds both networks, bootstraps the generator and picks the loss
/// 4. Opens the packed-frame dataset
/// 5. Runs the epoch loop with progress display, checkpoints and report
pub fn train_from_spec(spec: &TrainSpec, show_progress: bool) -> Result<TrainResult> {
    validate_config(spec)?;
    validate_paths(spec)?;

    let compute = ComputeContext::resolve(spec.training.gpu_mode);
    let session = build_session(spec, compute)?;

    let mut dataset = PackedFrameDataset::from_spec(spec)?;

    let checkpoints = CheckpointCallback::new(&spec.checkpoint.save_folder, spec.model.upscale)
        .snapshots(spec.checkpoint.snapshots)
        .report_to(&spec.checkpoint.statistics_dir, spec.checkpoint.prefix.as_str());

    let mut trainer = Trainer::new(session, spec.loop_config());
    trainer.add_callback(ProgressCallback::new(show_progress));
    trainer.add_callback(checkpoints);

    trainer.train(&mut dataset)
}

/// Load a YAML file and train from it
///
/// # Example
///
/// ```no_run
/// use nitidez::config::train_from_yaml;
///
/// let result = train_from_yaml("config.yaml")?;
/// println!("{} epochs", result.epochs_run);
/// # Ok::<(), nitidez::Error>(())
/// ```
pub fn train_from_yaml<P: AsRef<Path>>(config_path: P) -> Result<TrainResult> {
    let spec = TrainSpec::load(config_path)?;
    train_from_spec(&spec, true)
}
