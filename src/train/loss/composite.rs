//! Composite adversarial/perceptual generator loss

use candle_core::{Tensor, D};
use candle_nn::loss::mse;
use serde::{Deserialize, Serialize};

use super::traits::LossStrategy;
use crate::models::FeatureExtractor;
use crate::{Error, Result};

/// Coefficients of the composite loss terms (the pixel term has weight 1)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    /// Weight of `mean(1 - D(G(z)))`
    pub adversarial: f64,
    /// Weight of the feature-space MSE
    pub perceptual: f64,
    /// Weight of the total-variation regularizer
    pub tv: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            adversarial: 0.001,
            perceptual: 0.006,
            tv: 2e-8,
        }
    }
}

/// Pixel MSE + adversarial + perceptual + total-variation loss
///
/// Each sample of the batch contributes one equally weighted term built from
/// its synthesized frame, its fake score and its target frame. Without a
/// feature extractor the perceptual term is dropped.
pub struct CompositeLoss {
    weights: CompositeWeights,
    features: Option<Box<dyn FeatureExtractor>>,
}

impl CompositeLoss {
    /// Composite loss with default weights
    pub fn new(features: Option<Box<dyn FeatureExtractor>>) -> Self {
        Self {
            weights: CompositeWeights::default(),
            features,
        }
    }

    /// Override term weights
    pub fn with_weights(mut self, weights: CompositeWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Whether the perceptual term is active
    pub fn has_perceptual(&self) -> bool {
        self.features.is_some()
    }

    fn sample_loss(&self, output: &Tensor, score: &Tensor, target: &Tensor) -> Result<Tensor> {
        let image = mse(output, target)?;
        let adversarial = score.affine(-1.0, 1.0)?.mean_all()?;
        let tv = tv_loss(output)?;

        let mut loss = ((image + adversarial.affine(self.weights.adversarial, 0.0)?)?
            + tv.affine(self.weights.tv, 0.0)?)?;
        if let Some(extractor) = &self.features {
            let perceptual = mse(&extractor.features(output)?, &extractor.features(target)?)?;
            loss = (loss + perceptual.affine(self.weights.perceptual, 0.0)?)?;
        }
        Ok(loss)
    }
}

impl LossStrategy for CompositeLoss {
    fn compute(
        &self,
        fake_outputs: &Tensor,
        fake_scores: &Tensor,
        targets: &Tensor,
    ) -> Result<Tensor> {
        let batch = fake_outputs.dim(0)?;
        if targets.dim(0)? != batch || fake_scores.dim(0)? != batch {
            return Err(Error::Batch(format!(
                "outputs, scores and targets disagree on batch size: {:?}, {:?}, {:?}",
                fake_outputs.dims(),
                fake_scores.dims(),
                targets.dims()
            )));
        }

        let mut total = Tensor::zeros((), fake_outputs.dtype(), fake_outputs.device())?;
        for i in 0..batch {
            let term = self.sample_loss(
                &fake_outputs.narrow(0, i, 1)?,
                &fake_scores.narrow(0, i, 1)?,
                &targets.narrow(0, i, 1)?,
            )?;
            total = (total + term)?;
        }
        Ok(total)
    }

    fn name(&self) -> &str {
        "Composite"
    }
}

/// Total-variation regularizer of `[B, C, H, W]` images
///
/// `2 * (h_tv / count_h + w_tv / count_w) / B` where `h_tv` and `w_tv` are the
/// summed squared differences between vertically and horizontally adjacent
/// pixels. A direction with a single row or column contributes zero.
pub fn tv_loss(images: &Tensor) -> Result<Tensor> {
    let (batch, channels, height, width) = images.dims4()?;
    let mut total = Tensor::zeros((), images.dtype(), images.device())?;

    if height > 1 {
        let count = (channels * (height - 1) * width) as f64;
        let diff = (images.narrow(D::Minus2, 1, height - 1)?
            - images.narrow(D::Minus2, 0, height - 1)?)?;
        total = (total + diff.sqr()?.sum_all()?.affine(1.0 / count, 0.0)?)?;
    }
    if width > 1 {
        let count = (channels * height * (width - 1)) as f64;
        let diff = (images.narrow(D::Minus1, 1, width - 1)?
            - images.narrow(D::Minus1, 0, width - 1)?)?;
        total = (total + diff.sqr()?.sum_all()?.affine(1.0 / count, 0.0)?)?;
    }

    Ok(total.affine(2.0 / batch.max(1) as f64, 0.0)?)
}
