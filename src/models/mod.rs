//! Networks trained by the adversarial loop
//!
//! The training loop only sees networks through three traits:
//! - [`Network`] - owns a parameter store and a train/eval mode
//! - [`SuperResolver`] - generator producing a high-resolution frame
//! - [`Critic`] - discriminator scoring frames as real (1) or synthetic (0)
//!
//! Reference implementations are kept deliberately compact:
//! - [`ProjectionGenerator`] - recurrent back-projection over the neighbor window
//! - [`FrameCritic`] - strided convolutional discriminator
//! - [`Vgg16Features`] - frozen feature extractor for the perceptual term

mod discriminator;
mod features;
mod generator;

pub use discriminator::{CriticConfig, FrameCritic};
pub use features::{FeatureExtractor, Vgg16Features};
pub use generator::{GeneratorConfig, ProjectionGenerator};

use candle_core::Tensor;
use candle_nn::VarMap;

use crate::Result;

/// Execution mode of a network
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Parameters are being optimized
    #[default]
    Train,
    /// Inference only
    Eval,
}

/// A network backed by a named parameter store
pub trait Network {
    /// Parameter store holding every trainable variable
    fn vars(&self) -> &VarMap;

    /// Switch between training and evaluation behavior
    fn set_mode(&mut self, mode: Mode);

    /// Current execution mode
    fn mode(&self) -> Mode;

    /// Total number of scalar parameters
    fn num_parameters(&self) -> usize {
        self.vars()
            .all_vars()
            .iter()
            .map(|v| v.as_tensor().elem_count())
            .sum()
    }
}

/// Generator: maps a low-resolution frame and its temporal context to a
/// high-resolution estimate
pub trait SuperResolver: Network {
    /// Produce `[B, 3, h * s, w * s]` from `[B, 3, h, w]` plus one neighbor
    /// frame and one flow field per window position
    fn forward(&self, input: &Tensor, neighbors: &[Tensor], flows: &[Tensor]) -> Result<Tensor>;
}

/// Discriminator: scores each frame of a batch
pub trait Critic: Network {
    /// Probability that each frame is real, shape `[B]`, values in `[0, 1]`
    fn score(&self, frames: &Tensor) -> Result<Tensor>;
}
