//! Loss strategy trait

use candle_core::Tensor;

use crate::Result;

/// Generator objective, selected once per session
pub trait LossStrategy: Send {
    /// Loss for a batch of synthesized frames
    ///
    /// `fake_outputs` and `targets` are `[B, 3, H, W]`, `fake_scores` is the
    /// discriminator output on `fake_outputs`, shape `[B]`. The returned
    /// scalar keeps the autograd graph to every input.
    fn compute(&self, fake_outputs: &Tensor, fake_scores: &Tensor, targets: &Tensor)
        -> Result<Tensor>;

    /// Name of the strategy
    fn name(&self) -> &str;
}
