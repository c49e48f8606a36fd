//! Random cropping and flip augmentation of frame samples

use candle_core::{Tensor, D};
use rand::Rng;

use super::batch::FrameSample;
use crate::{Error, Result};

/// Low-resolution crop: top-left corner and side length
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropWindow {
    /// Top row
    pub y: usize,
    /// Left column
    pub x: usize,
    /// Side length
    pub size: usize,
}

impl CropWindow {
    /// Pick a window of `size` uniformly inside an `h x w` frame
    pub fn random<R: Rng>(rng: &mut R, h: usize, w: usize, size: usize) -> Result<Self> {
        if size > h || size > w {
            return Err(Error::Dataset(format!(
                "patch size {size} does not fit a {h}x{w} frame"
            )));
        }
        Ok(Self {
            y: rng.random_range(0..=h - size),
            x: rng.random_range(0..=w - size),
            size,
        })
    }
}

fn crop(t: &Tensor, y: usize, x: usize, size: usize) -> Result<Tensor> {
    Ok(t
        .narrow(D::Minus2, y, size)?
        .narrow(D::Minus1, x, size)?
        .contiguous()?)
}

/// Crop every low-resolution tensor to `window` and every high-resolution
/// tensor to the matching `window * scale` region
pub fn random_crop(sample: &FrameSample, window: CropWindow, scale: usize) -> Result<FrameSample> {
    let CropWindow { y, x, size } = window;
    let lr = |t: &Tensor| crop(t, y, x, size);
    let hr = |t: &Tensor| crop(t, y * scale, x * scale, size * scale);

    Ok(FrameSample {
        input: lr(&sample.input)?,
        target: hr(&sample.target)?,
        neighbors: sample.neighbors.iter().map(lr).collect::<Result<_>>()?,
        flows: sample.flows.iter().map(lr).collect::<Result<_>>()?,
        bicubic: hr(&sample.bicubic)?,
    })
}

/// Reverse `t` along the axis `from_end` positions from the last one
fn reverse(t: &Tensor, from_end: usize) -> Result<Tensor> {
    let dim = t.rank().checked_sub(from_end).ok_or_else(|| {
        Error::Dataset(format!("cannot flip a tensor of shape {:?}", t.dims()))
    })?;
    let len = t.dim(dim)?;
    let idx: Vec<u32> = (0..len as u32).rev().collect();
    let idx = Tensor::new(idx.as_slice(), t.device())?;
    Ok(t.contiguous()?.index_select(&idx, dim)?)
}

fn scale_flow(flow: &Tensor, sx: f32, sy: f32) -> Result<Tensor> {
    let signs = Tensor::new(&[sx, sy], flow.device())?
        .to_dtype(flow.dtype())?
        .reshape((2, 1, 1))?;
    Ok(flow.broadcast_mul(&signs)?)
}

fn flip(sample: &FrameSample, from_end: usize, sx: f32, sy: f32) -> Result<FrameSample> {
    let rev = |t: &Tensor| reverse(t, from_end);
    Ok(FrameSample {
        input: rev(&sample.input)?,
        target: rev(&sample.target)?,
        neighbors: sample.neighbors.iter().map(rev).collect::<Result<_>>()?,
        flows: sample
            .flows
            .iter()
            .map(|f| scale_flow(&rev(f)?, sx, sy))
            .collect::<Result<_>>()?,
        bicubic: rev(&sample.bicubic)?,
    })
}

/// Mirror left-right; the horizontal flow component changes sign
pub fn flip_horizontal(sample: &FrameSample) -> Result<FrameSample> {
    flip(sample, 1, -1.0, 1.0)
}

/// Mirror top-bottom; the vertical flow component changes sign
pub fn flip_vertical(sample: &FrameSample) -> Result<FrameSample> {
    flip(sample, 2, 1.0, -1.0)
}

/// Flip horizontally and vertically, each with probability one half
pub fn augment<R: Rng>(sample: FrameSample, rng: &mut R) -> Result<FrameSample> {
    let mut sample = sample;
    if rng.random_bool(0.5) {
        sample = flip_horizontal(&sample)?;
    }
    if rng.random_bool(0.5) {
        sample = flip_vertical(&sample)?;
    }
    Ok(sample)
}
