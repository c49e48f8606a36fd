//! Nitidez: adversarial training for video super-resolution
//!
//! Trains a recurrent projection generator against a frame discriminator:
//! - One discriminator update followed by one generator update per batch
//! - Composite (adversarial + pixel + perceptual + total-variation) or L1 loss
//! - Per-epoch metric accumulation, learning-rate decay and checkpointing
//! - Pretrained generator bootstrap with data-parallel key stripping
//!
//! # Example
//!
//! ```no_run
//! use nitidez::config::{build_session, TrainSpec};
//! use nitidez::data::{BatchSource, PackedFrameDataset};
//! use nitidez::train::Trainer;
//! use nitidez::ComputeContext;
//!
//! let spec = TrainSpec::default();
//! let compute = ComputeContext::resolve(spec.training.gpu_mode);
//! let session = build_session(&spec, compute)?;
//! let mut dataset = PackedFrameDataset::from_spec(&spec)?;
//!
//! let mut trainer = Trainer::new(session, spec.loop_config());
//! let result = trainer.train(&mut dataset)?;
//! println!("trained {} epochs", result.epochs_run);
//! # Ok::<(), nitidez::Error>(())
//! ```

pub mod cli;
pub mod compute;
pub mod config;
pub mod data;
mod error;
pub mod io;
pub mod models;
pub mod optim;
pub mod train;

pub use compute::ComputeContext;
pub use error::{Error, Result};
