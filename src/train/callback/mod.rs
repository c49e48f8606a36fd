//! Callback system for training events
//!
//! Provides hooks for training loop events:
//! - `on_train_begin` / `on_train_end`
//! - `on_epoch_begin` / `on_epoch_end`
//! - `on_step_end`
//!
//! # Example
//!
//! ```rust
//! use nitidez::train::{CallbackAction, CallbackContext, TrainerCallback};
//!
//! struct PrintCallback;
//!
//! impl TrainerCallback for PrintCallback {
//!     fn on_epoch_end(&mut self, ctx: &CallbackContext) -> nitidez::Result<CallbackAction> {
//!         println!("Epoch {} finished with G loss {:.4}", ctx.epoch, ctx.metrics.g_loss);
//!         Ok(CallbackAction::Continue)
//!     }
//! }
//! ```

mod checkpoint;
mod manager;
mod progress;
mod traits;

pub use checkpoint::CheckpointCallback;
pub use manager::CallbackManager;
pub use progress::ProgressCallback;
pub use traits::{CallbackAction, CallbackContext, TrainerCallback};
