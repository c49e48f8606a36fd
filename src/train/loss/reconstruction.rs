//! L1 reconstruction loss

use candle_core::Tensor;

use super::traits::LossStrategy;
use crate::{Error, Result};

/// Mean absolute error between synthesized and target frames
///
/// Ignores discriminator scores entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReconstructionLoss;

impl LossStrategy for ReconstructionLoss {
    fn compute(
        &self,
        fake_outputs: &Tensor,
        _fake_scores: &Tensor,
        targets: &Tensor,
    ) -> Result<Tensor> {
        if fake_outputs.dims() != targets.dims() {
            return Err(Error::Batch(format!(
                "output {:?} and target {:?} differ in shape",
                fake_outputs.dims(),
                targets.dims()
            )));
        }
        Ok((fake_outputs - targets)?.abs()?.mean_all()?)
    }

    fn name(&self) -> &str {
        "L1"
    }
}
