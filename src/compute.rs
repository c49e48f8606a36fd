//! Compute context: device placement and dtype policy
//!
//! Resolved once when a session is built and passed to every call that
//! creates or moves tensors, so the hot loop never re-checks device state.

use candle_core::{DType, Device, Tensor};

use crate::Result;

/// Device and dtype used for every tensor of a training session
#[derive(Debug, Clone)]
pub struct ComputeContext {
    device: Device,
    dtype: DType,
}

impl ComputeContext {
    /// Context that runs everything on the CPU in `f32`
    pub fn cpu() -> Self {
        Self {
            device: Device::Cpu,
            dtype: DType::F32,
        }
    }

    /// Resolve the preferred device, falling back to CPU when no GPU is usable
    pub fn resolve(gpu_mode: bool) -> Self {
        if !gpu_mode {
            tracing::debug!("GPU mode disabled, running on CPU");
            return Self::cpu();
        }

        match Device::cuda_if_available(0) {
            Ok(device) if device.is_cuda() => {
                tracing::info!("Using CUDA device #0");
                Self {
                    device,
                    dtype: DType::F32,
                }
            }
            Ok(_) => {
                tracing::warn!("GPU mode requested but no CUDA device is available, falling back to CPU");
                Self::cpu()
            }
            Err(e) => {
                tracing::warn!("Failed to initialize CUDA device ({e}), falling back to CPU");
                Self::cpu()
            }
        }
    }

    /// Device tensors are placed on
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Floating point type used for activations and parameters
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Whether this context runs on a GPU
    pub fn is_gpu(&self) -> bool {
        self.device.is_cuda()
    }

    /// Move a tensor onto this context's device and dtype
    pub fn place(&self, tensor: &Tensor) -> Result<Tensor> {
        Ok(tensor.to_device(&self.device)?.to_dtype(self.dtype)?)
    }

    /// Seed the device random generator
    ///
    /// The CPU backend draws from a process-wide generator that cannot be
    /// reseeded, so only GPU contexts are affected.
    pub fn seed(&self, seed: u64) -> Result<()> {
        if self.is_gpu() {
            self.device.set_seed(seed)?;
        } else {
            tracing::debug!("CPU tensor initialization is not seedable, seed {seed} applies to data order only");
        }
        Ok(())
    }
}

impl Default for ComputeContext {
    fn default() -> Self {
        Self::cpu()
    }
}

/// Read a scalar tensor as `f32` regardless of its dtype
pub fn scalar(tensor: &Tensor) -> Result<f32> {
    Ok(tensor.to_dtype(DType::F32)?.to_scalar::<f32>()?)
}
