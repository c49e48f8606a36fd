//! Recurrent projection generator
//!
//! The center frame is encoded once, then every neighbor (with its flow
//! field) is fused into a running hidden state. Each state is projected to
//! high resolution with a sub-pixel convolution and all projections are
//! merged into the output frame.

use candle_core::Tensor;
use candle_nn::{conv2d, ops, Conv2d, Conv2dConfig, Module, VarBuilder, VarMap};
use serde::{Deserialize, Serialize};

use super::{Mode, Network, SuperResolver};
use crate::compute::ComputeContext;
use crate::{Error, Result};

/// Shape of a [`ProjectionGenerator`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Spatial upscale factor
    pub upscale: usize,
    /// Neighbor frames per sample (`n_frames - 1`)
    pub neighbors: usize,
    /// Low-resolution feature width
    pub features: usize,
    /// High-resolution feature width per projection
    pub hr_features: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            upscale: 4,
            neighbors: 6,
            features: 64,
            hr_features: 16,
        }
    }
}

/// Compact recurrent back-projection network
pub struct ProjectionGenerator {
    vars: VarMap,
    config: GeneratorConfig,
    mode: Mode,
    conv_in: Conv2d,
    motion: Conv2d,
    fuse: Conv2d,
    up: Conv2d,
    conv_out: Conv2d,
}

fn same(kernel: usize) -> Conv2dConfig {
    Conv2dConfig {
        padding: kernel / 2,
        ..Default::default()
    }
}

impl ProjectionGenerator {
    /// Create a freshly initialized generator on the given compute context
    pub fn new(config: GeneratorConfig, compute: &ComputeContext) -> Result<Self> {
        if config.upscale == 0 || config.features == 0 || config.hr_features == 0 {
            return Err(Error::ConfigError(format!(
                "generator widths and upscale must be positive, got {config:?}"
            )));
        }

        let vars = VarMap::new();
        let vb = VarBuilder::from_varmap(&vars, compute.dtype(), compute.device());
        let f = config.features;
        let fh = config.hr_features;
        let s = config.upscale;

        let conv_in = conv2d(3, f, 3, same(3), vb.pp("conv_in"))?;
        let motion = conv2d(3 + 3 + 2, f, 3, same(3), vb.pp("motion"))?;
        let fuse = conv2d(2 * f, f, 3, same(3), vb.pp("fuse"))?;
        let up = conv2d(f, fh * s * s, 3, same(3), vb.pp("up"))?;
        let conv_out = conv2d(fh * (config.neighbors + 1), 3, 3, same(3), vb.pp("conv_out"))?;

        Ok(Self {
            vars,
            config,
            mode: Mode::Train,
            conv_in,
            motion,
            fuse,
            up,
            conv_out,
        })
    }

    /// Network shape
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn project(&self, state: &Tensor) -> Result<Tensor> {
        let hr = self.up.forward(state)?;
        Ok(ops::pixel_shuffle(&hr, self.config.upscale)?.relu()?)
    }
}

impl Network for ProjectionGenerator {
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

impl SuperResolver for ProjectionGenerator {
    fn forward(&self, input: &Tensor, neighbors: &[Tensor], flows: &[Tensor]) -> Result<Tensor> {
        if neighbors.len() != self.config.neighbors || flows.len() != self.config.neighbors {
            return Err(Error::Batch(format!(
                "generator expects {} neighbors and flows, got {} and {}",
                self.config.neighbors,
                neighbors.len(),
                flows.len()
            )));
        }

        let mut state = self.conv_in.forward(input)?.relu()?;
        let mut projections = Vec::with_capacity(neighbors.len() + 1);
        projections.push(self.project(&state)?);

        for (neighbor, flow) in neighbors.iter().zip(flows) {
            let motion = self
                .motion
                .forward(&Tensor::cat(&[input, neighbor, flow], 1)?)?
                .relu()?;
            state = self.fuse.forward(&Tensor::cat(&[&state, &motion], 1)?)?.relu()?;
            projections.push(self.project(&state)?);
        }

        let merged = Tensor::cat(&projections, 1)?;
        Ok(self.conv_out.forward(&merged)?)
    }
}
