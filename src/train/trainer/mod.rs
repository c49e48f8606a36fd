//! Trainer: the epoch loop around the optimization step
//!
//! This module provides a `Trainer` that orchestrates:
//! - Epoch iteration from `start_epoch` to `n_epochs`
//! - Optional skipping of the first batch of every epoch
//! - Weighted metric accumulation
//! - Generator learning-rate decay at every half of the run
//! - Callback dispatch (progress display, checkpoints and reports)

mod core;
mod epoch;
mod result;
mod train_loop;

pub use core::Trainer;
pub use result::{EpochSummary, TrainResult};
