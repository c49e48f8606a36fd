//! Nitidez CLI
//!
//! Adversarial training for video super-resolution.
//!
//! # Usage
//!
//! ```bash
//! # Train from config
//! nitidez train config.yaml
//!
//! # Train with overrides
//! nitidez train config.yaml --n-epochs 10 --lr 0.001 --pretrained
//!
//! # Validate config and check input paths
//! nitidez validate config.yaml --detailed
//!
//! # List the tensors of a checkpoint
//! nitidez inspect weights/netG_epoch_4_1.safetensors
//! ```

use clap::Parser;
use nitidez::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
