//! Frozen feature extractors for perceptual losses

use std::path::Path;

use candle_core::Tensor;
use candle_nn::{conv2d, Conv2d, Conv2dConfig, Module, VarBuilder};

use crate::compute::ComputeContext;
use crate::Result;

/// Maps images to a feature space where distances are compared
pub trait FeatureExtractor: Send {
    /// Features of `[B, 3, H, W]` images
    fn features(&self, images: &Tensor) -> Result<Tensor>;
}

/// Output channels of the VGG16 convolution stack; `None` is a 2x2 max-pool
const VGG16_LAYOUT: [Option<usize>; 18] = [
    Some(64),
    Some(64),
    None,
    Some(128),
    Some(128),
    None,
    Some(256),
    Some(256),
    Some(256),
    None,
    Some(512),
    Some(512),
    Some(512),
    None,
    Some(512),
    Some(512),
    Some(512),
    None,
];

enum Layer {
    Conv(Conv2d),
    Pool,
}

/// The convolutional part of VGG16 (all 13 convolutions and 5 pools)
///
/// Weights are read from a safetensors file using torchvision key names,
/// `features.<index>.weight` and `features.<index>.bias`, where the index
/// counts convolutions, activations and pools alike. The tensors are plain
/// constants, so no gradient is ever applied to them.
pub struct Vgg16Features {
    layers: Vec<Layer>,
}

impl Vgg16Features {
    /// Load the extractor from a safetensors file
    pub fn load(path: &Path, compute: &ComputeContext) -> Result<Self> {
        let tensors = candle_core::safetensors::load(path, compute.device())?;
        let vb = VarBuilder::from_tensors(tensors, compute.dtype(), compute.device());
        Self::from_builder(vb)
    }

    fn from_builder(vb: VarBuilder) -> Result<Self> {
        let vb = vb.pp("features");
        let cfg = Conv2dConfig {
            padding: 1,
            ..Default::default()
        };

        let mut layers = Vec::with_capacity(VGG16_LAYOUT.len());
        let mut index = 0;
        let mut channels = 3;
        for entry in VGG16_LAYOUT {
            match entry {
                Some(out) => {
                    layers.push(Layer::Conv(conv2d(channels, out, 3, cfg, vb.pp(index))?));
                    channels = out;
                    // conv + relu
                    index += 2;
                }
                None => {
                    layers.push(Layer::Pool);
                    index += 1;
                }
            }
        }
        tracing::debug!("Loaded VGG16 feature stack ({} modules)", index);
        Ok(Self { layers })
    }
}

impl FeatureExtractor for Vgg16Features {
    fn features(&self, images: &Tensor) -> Result<Tensor> {
        let mut xs = images.clone();
        for layer in &self.layers {
            xs = match layer {
                Layer::Conv(conv) => conv.forward(&xs)?.relu()?,
                Layer::Pool => xs.max_pool2d(2)?,
            };
        }
        Ok(xs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use std::collections::HashMap;

    #[test]
    fn test_layout_spans_first_31_modules() {
        let convs = VGG16_LAYOUT.iter().filter(|l| l.is_some()).count();
        let pools = VGG16_LAYOUT.len() - convs;
        assert_eq!(convs, 13);
        assert_eq!(pools, 5);
        assert_eq!(convs * 2 + pools, 31);
    }

    #[test]
    fn test_load_from_safetensors() {
        let dev = Device::Cpu;
        let mut tensors = HashMap::new();
        let mut index = 0;
        let mut channels = 3;
        for entry in VGG16_LAYOUT {
            match entry {
                Some(out) => {
                    tensors.insert(
                        format!("features.{index}.weight"),
                        Tensor::zeros((out, channels, 3, 3), DType::F32, &dev).unwrap(),
                    );
                    tensors.insert(
                        format!("features.{index}.bias"),
                        Tensor::zeros(out, DType::F32, &dev).unwrap(),
                    );
                    channels = out;
                    index += 2;
                }
                None => index += 1,
            }
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vgg16.safetensors");
        candle_core::safetensors::save(&tensors, &path).unwrap();

        let vgg = Vgg16Features::load(&path, &ComputeContext::cpu()).unwrap();
        let images = Tensor::ones((1, 3, 32, 32), DType::F32, &dev).unwrap();
        let feats = vgg.features(&images).unwrap();
        assert_eq!(feats.dims(), &[1, 512, 1, 1]);
    }

    #[test]
    fn test_load_missing_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.safetensors");
        let tensors: HashMap<String, Tensor> = HashMap::from([(
            "unrelated".to_string(),
            Tensor::zeros(1, DType::F32, &Device::Cpu).unwrap(),
        )]);
        candle_core::safetensors::save(&tensors, &path).unwrap();
        assert!(Vgg16Features::load(&path, &ComputeContext::cpu()).is_err());
    }
}
