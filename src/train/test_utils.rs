//! Deterministic stand-in networks for training tests

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use candle_core::{DType, Device, Tensor, Var};
use candle_nn::{Init, VarBuilder, VarMap};

use crate::compute::ComputeContext;
use crate::data::FrameBatch;
use crate::models::{Critic, Mode, Network, SuperResolver};
use crate::optim::AdamConfig;
use crate::train::{CompositeLoss, StepConfig, TrainingSession};
use crate::Result;

/// Upsamples 2x (nearest) and multiplies by one learnable scale
pub struct ScaleGenerator {
    vars: VarMap,
    scale: Tensor,
    mode: Mode,
    calls: Arc<AtomicUsize>,
}

impl ScaleGenerator {
    pub fn new(scale: f32) -> Self {
        let vars = VarMap::new();
        let vb = VarBuilder::from_varmap(&vars, DType::F32, &Device::Cpu);
        let scale = vb
            .get_with_hints(1, "scale", Init::Const(f64::from(scale)))
            .unwrap();
        Self {
            vars,
            scale,
            mode: Mode::Train,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn scale_var(&self) -> Var {
        self.vars.all_vars().into_iter().next().unwrap()
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Network for ScaleGenerator {
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

impl SuperResolver for ScaleGenerator {
    fn forward(&self, input: &Tensor, _neighbors: &[Tensor], _flows: &[Tensor]) -> Result<Tensor> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (_, _, h, w) = input.dims4()?;
        let up = input.upsample_nearest2d(h * 2, w * 2)?;
        Ok(up.broadcast_mul(&self.scale)?)
    }
}

/// Scores every real frame `real` and every synthesized frame `fake`
///
/// Calls alternate real, fake, real, fake... matching the order of the
/// optimization step.
pub struct FixedCritic {
    vars: VarMap,
    bias: Tensor,
    real: f32,
    fake: f32,
    calls: Cell<usize>,
    mode: Mode,
}

impl FixedCritic {
    pub fn new(real: f32, fake: f32) -> Self {
        let vars = VarMap::new();
        let vb = VarBuilder::from_varmap(&vars, DType::F32, &Device::Cpu);
        let bias = vb.get_with_hints(1, "bias", Init::Const(0.0)).unwrap();
        Self {
            vars,
            bias,
            real,
            fake,
            calls: Cell::new(0),
            mode: Mode::Train,
        }
    }
}

impl Network for FixedCritic {
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

impl Critic for FixedCritic {
    fn score(&self, frames: &Tensor) -> Result<Tensor> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        let value = if call % 2 == 0 { self.real } else { self.fake };
        let batch = frames.dim(0)?;
        let constant = Tensor::full(value, batch, frames.device())?;
        Ok(self.bias.affine(0.0, 0.0)?.broadcast_add(&constant)?)
    }
}

/// Batch of constant frames: LR `2x2`, HR `4x4`, target and bicubic equal
pub fn batch(samples: usize, neighbors: usize, value: f32) -> FrameBatch {
    let dev = Device::Cpu;
    let lr = || Tensor::full(value, (samples, 3, 2, 2), &dev).unwrap();
    let hr = || Tensor::full(value, (samples, 3, 4, 4), &dev).unwrap();
    FrameBatch::new(
        lr(),
        hr(),
        (0..neighbors).map(|_| lr()).collect(),
        (0..neighbors)
            .map(|_| Tensor::zeros((samples, 2, 2, 2), DType::F32, &dev).unwrap())
            .collect(),
        hr(),
    )
}

/// CPU session with the composite loss (no perceptual term)
pub fn session_with(
    generator: ScaleGenerator,
    critic: FixedCritic,
    config: StepConfig,
) -> TrainingSession {
    TrainingSession::new(
        Box::new(generator),
        Box::new(critic),
        Box::new(CompositeLoss::new(None)),
        ComputeContext::cpu(),
        AdamConfig::with_lr(1e-2),
        config,
    )
    .unwrap()
}
