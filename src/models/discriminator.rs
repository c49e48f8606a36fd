//! Strided convolutional frame discriminator

use candle_core::{Tensor, D};
use candle_nn::{conv2d, ops, Conv2d, Conv2dConfig, Module, VarBuilder, VarMap};
use serde::{Deserialize, Serialize};

use super::{Critic, Mode, Network};
use crate::compute::ComputeContext;
use crate::{Error, Result};

const LEAK: f64 = 0.2;

/// Shape of a [`FrameCritic`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticConfig {
    /// Width of the first convolution; deeper blocks double it
    pub features: usize,
    /// Number of stride-2 blocks
    pub blocks: usize,
}

impl Default for CriticConfig {
    fn default() -> Self {
        Self {
            features: 64,
            blocks: 3,
        }
    }
}

/// Convolutional critic ending in global pooling and a sigmoid head
pub struct FrameCritic {
    vars: VarMap,
    mode: Mode,
    body: Vec<Conv2d>,
    hidden: Conv2d,
    head: Conv2d,
}

impl FrameCritic {
    /// Create a freshly initialized critic on the given compute context
    pub fn new(config: CriticConfig, compute: &ComputeContext) -> Result<Self> {
        if config.features == 0 || config.blocks == 0 {
            return Err(Error::ConfigError(format!(
                "critic width and depth must be positive, got {config:?}"
            )));
        }

        let vars = VarMap::new();
        let vb = VarBuilder::from_varmap(&vars, compute.dtype(), compute.device());
        let keep = Conv2dConfig {
            padding: 1,
            ..Default::default()
        };
        let down = Conv2dConfig {
            padding: 1,
            stride: 2,
            ..Default::default()
        };

        let mut body = Vec::with_capacity(2 * config.blocks);
        let mut width = config.features;
        body.push(conv2d(3, width, 3, keep, vb.pp("body.0"))?);
        for block in 0..config.blocks {
            let idx = body.len();
            body.push(conv2d(width, width, 3, down, vb.pp(format!("body.{idx}")))?);
            if block + 1 < config.blocks {
                let idx = body.len();
                body.push(conv2d(width, width * 2, 3, keep, vb.pp(format!("body.{idx}")))?);
                width *= 2;
            }
        }

        let hidden = conv2d(width, width * 2, 1, Default::default(), vb.pp("hidden"))?;
        let head = conv2d(width * 2, 1, 1, Default::default(), vb.pp("head"))?;

        Ok(Self {
            vars,
            mode: Mode::Train,
            body,
            hidden,
            head,
        })
    }
}

impl Network for FrameCritic {
    fn vars(&self) -> &VarMap {
        &self.vars
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn mode(&self) -> Mode {
        self.mode
    }
}

impl Critic for FrameCritic {
    fn score(&self, frames: &Tensor) -> Result<Tensor> {
        let batch = frames.dim(0)?;
        let mut xs = frames.clone();
        for conv in &self.body {
            xs = ops::leaky_relu(&conv.forward(&xs)?, LEAK)?;
        }
        let pooled = xs.mean_keepdim(D::Minus1)?.mean_keepdim(D::Minus2)?;
        let hidden = ops::leaky_relu(&self.hidden.forward(&pooled)?, LEAK)?;
        let logits = self.head.forward(&hidden)?;
        Ok(ops::sigmoid(&logits)?.reshape(batch)?)
    }
}
