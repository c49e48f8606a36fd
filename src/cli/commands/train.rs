//! Train command implementation

use crate::cli::logging::{init_tracing, log};
use crate::cli::LogLevel;
use crate::config::{apply_overrides, train_from_spec, validate_config, TrainArgs, TrainSpec};

/// Resolve the spec: YAML file (or defaults) with command-line overrides
pub fn resolve_spec(args: &TrainArgs) -> Result<TrainSpec, String> {
    let mut spec = match &args.config {
        Some(path) => TrainSpec::load(path).map_err(|e| format!("Config error: {e}"))?,
        None => TrainSpec::default(),
    };
    apply_overrides(&mut spec, args);
    validate_config(&spec).map_err(|e| format!("Config error: {e}"))?;
    Ok(spec)
}

/// Run the train command: resolve settings, then train or stop after a dry run
pub fn run_train(args: TrainArgs, level: LogLevel) -> Result<(), String> {
    let spec = resolve_spec(&args)?;
    init_tracing(level, spec.training.debug);

    match &args.config {
        Some(path) => log(
            level,
            LogLevel::Normal,
            &format!("Nitidez: Training from {}", path.display()),
        ),
        None => log(level, LogLevel::Normal, "Nitidez: Training with default settings"),
    }

    if args.dry_run {
        log(
            level,
            LogLevel::Normal,
            "Dry run - config validated successfully",
        );
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "  Upscale: {}x, frames: {}, residual: {}",
                spec.model.upscale, spec.data.n_frames, spec.model.residual
            ),
        );
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "  Epochs: {}..={}, batch size: {}, lr: {}",
                spec.training.start_epoch,
                spec.training.n_epochs,
                spec.data.batch_size,
                spec.optimizer.lr
            ),
        );
        return Ok(());
    }

    let result =
        train_from_spec(&spec, level != LogLevel::Quiet).map_err(|e| format!("Training error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Training complete! {} epochs, {} steps, final lr {:.2e}",
            result.epochs_run, result.steps, result.lr_g
        ),
    );
    if result.skipped_batches > 0 {
        log(
            level,
            LogLevel::Normal,
            &format!("  Skipped batches: {}", result.skipped_batches),
        );
    }
    Ok(())
}
