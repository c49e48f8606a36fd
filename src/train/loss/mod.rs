//! Generator loss strategies
//!
//! - [`CompositeLoss`] - pixel MSE plus adversarial, perceptual and total-variation terms
//! - [`ReconstructionLoss`] - plain L1 between synthesized and target frames
//!
//! Both return the loss summed over the batch; the optimization step divides
//! by the batch cardinality.

mod composite;
mod reconstruction;
mod traits;

pub use composite::{tv_loss, CompositeLoss, CompositeWeights};
pub use reconstruction::ReconstructionLoss;
pub use traits::LossStrategy;
