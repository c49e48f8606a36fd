//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! nitidez train config.yaml
//! nitidez train config.yaml --n-epochs 10 --lr 0.001 --pretrained
//! nitidez validate config.yaml --detailed
//! nitidez inspect weights/netG_epoch_4_1.safetensors --format json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::schema::TrainSpec;

/// Nitidez: adversarial video super-resolution training
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "nitidez")]
#[command(version)]
#[command(about = "Adversarial training for video super-resolution networks")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Train generator and discriminator from a YAML configuration
    Train(TrainArgs),

    /// Validate a configuration file without training
    Validate(ValidateArgs),

    /// List the tensors of a safetensors checkpoint
    Inspect(InspectArgs),
}

/// Arguments for the train command
///
/// Every override takes precedence over the YAML file.
#[derive(Parser, Debug, Clone, PartialEq, Default)]
pub struct TrainArgs {
    /// Path to YAML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Super resolution upscale factor
    #[arg(long)]
    pub upscale_factor: Option<usize>,

    /// Training batch size
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Starting epoch for continuing training
    #[arg(long)]
    pub start_epoch: Option<usize>,

    /// Number of epochs to train for
    #[arg(short = 'e', long)]
    pub n_epochs: Option<usize>,

    /// Snapshot cadence in epochs
    #[arg(long)]
    pub snapshots: Option<usize>,

    /// Learning rate
    #[arg(short, long)]
    pub lr: Option<f64>,

    /// Run on the CPU even when a GPU is available
    #[arg(long)]
    pub cpu: bool,

    /// Threads used to decode samples
    #[arg(long)]
    pub threads: Option<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Dataset root directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Sample list relative to the dataset root
    #[arg(long)]
    pub file_list: Option<PathBuf>,

    /// Frames per window
    #[arg(long)]
    pub n_frames: Option<usize>,

    /// Low-resolution crop size (0 keeps the full frame)
    #[arg(long)]
    pub patch_size: Option<usize>,

    /// Add the bicubic reference to the generator output
    #[arg(long)]
    pub residual: bool,

    /// Load the pretrained generator from the save folder
    #[arg(long)]
    pub pretrained: bool,

    /// Pretrained generator file name
    #[arg(long)]
    pub pretrained_sr: Option<PathBuf>,

    /// Checkpoint directory
    #[arg(short, long)]
    pub save_folder: Option<PathBuf>,

    /// Report file name prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Train with L1 loss only
    #[arg(long = "use-l1-loss")]
    pub use_l1_loss: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub debug: bool,

    /// Validate config but don't train
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Also check that input paths exist and print the resolved settings
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the inspect command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InspectArgs {
    /// Path to a safetensors file
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for the inspect command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {s}. Valid formats: text, json")),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a TrainSpec
pub fn apply_overrides(spec: &mut TrainSpec, args: &TrainArgs) {
    if let Some(upscale) = args.upscale_factor {
        spec.model.upscale = upscale;
    }
    if let Some(batch_size) = args.batch_size {
        spec.data.batch_size = batch_size;
    }
    if let Some(start) = args.start_epoch {
        spec.training.start_epoch = start;
    }
    if let Some(n_epochs) = args.n_epochs {
        spec.training.n_epochs = n_epochs;
    }
    if let Some(snapshots) = args.snapshots {
        spec.checkpoint.snapshots = snapshots;
    }
    if let Some(lr) = args.lr {
        spec.optimizer.lr = lr;
    }
    if args.cpu {
        spec.training.gpu_mode = false;
    }
    if let Some(threads) = args.threads {
        spec.data.threads = threads;
    }
    if let Some(seed) = args.seed {
        spec.training.seed = seed;
    }
    if let Some(dir) = &args.data_dir {
        spec.data.data_dir = dir.clone();
    }
    if let Some(list) = &args.file_list {
        spec.data.file_list = list.clone();
    }
    if let Some(n_frames) = args.n_frames {
        spec.data.n_frames = n_frames;
    }
    if let Some(patch) = args.patch_size {
        spec.data.patch_size = patch;
    }
    if args.residual {
        spec.model.residual = true;
    }
    if args.pretrained {
        spec.checkpoint.pretrained = true;
    }
    if let Some(file) = &args.pretrained_sr {
        spec.checkpoint.pretrained_sr = file.clone();
    }
    if let Some(folder) = &args.save_folder {
        spec.checkpoint.save_folder = folder.clone();
    }
    if let Some(prefix) = &args.prefix {
        spec.checkpoint.prefix = prefix.clone();
    }
    if args.use_l1_loss {
        spec.model.use_l1_loss = true;
    }
    if args.debug {
        spec.training.debug = true;
    }
}
