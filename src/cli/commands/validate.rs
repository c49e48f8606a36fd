//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, validate_paths, TrainSpec, ValidateArgs};

/// Format model information as a string
pub fn format_model_info(spec: &TrainSpec) -> String {
    let mut lines = vec![
        format!("  Upscale: {}x", spec.model.upscale),
        format!(
            "  Generator widths: {}/{}",
            spec.model.features, spec.model.hr_features
        ),
        format!(
            "  Discriminator: {} blocks from width {}",
            spec.model.critic_blocks, spec.model.critic_features
        ),
        format!("  Residual: {}", spec.model.residual),
    ];
    let loss = if spec.model.use_l1_loss {
        "L1".to_string()
    } else if let Some(vgg) = &spec.model.vgg_weights {
        format!("Composite (VGG16: {})", vgg.display())
    } else {
        "Composite".to_string()
    };
    lines.push(format!("  Loss: {loss}"));
    lines.join("\n")
}

/// Format data configuration as a string
pub fn format_data_info(spec: &TrainSpec) -> String {
    let mut lines = vec![format!("  Data dir: {}", spec.data.data_dir.display())];
    if spec.data.other_dataset {
        lines.push("  Samples: every file under the data dir".to_string());
    } else {
        lines.push(format!("  File list: {}", spec.data.file_list.display()));
    }
    lines.push(format!(
        "  Frames: {} ({})",
        spec.data.n_frames,
        if spec.data.future_frame { "centered" } else { "past only" }
    ));
    lines.push(format!("  Patch size: {}", spec.data.patch_size));
    lines.push(format!("  Batch size: {}", spec.data.batch_size));
    lines.join("\n")
}

/// Format training configuration as a string
pub fn format_training_info(spec: &TrainSpec) -> String {
    let lines = [
        format!(
            "  Epochs: {}..={}",
            spec.training.start_epoch, spec.training.n_epochs
        ),
        format!("  Learning rate: {}", spec.optimizer.lr),
        format!("  Skip first batch: {}", spec.training.skip_first_batch),
        format!("  Snapshots every: {} epochs", spec.checkpoint.snapshots),
        format!("  Save folder: {}", spec.checkpoint.save_folder.display()),
    ];
    lines.join("\n")
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    if args.detailed {
        validate_paths(&spec).map_err(|e| format!("Path error: {e}"))?;
        log(level, LogLevel::Normal, "Model:");
        log(level, LogLevel::Normal, &format_model_info(&spec));
        log(level, LogLevel::Normal, "Data:");
        log(level, LogLevel::Normal, &format_data_info(&spec));
        log(level, LogLevel::Normal, "Training:");
        log(level, LogLevel::Normal, &format_training_info(&spec));
    }

    log(level, LogLevel::Normal, "✓ Configuration is valid");
    Ok(())
}
