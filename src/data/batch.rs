//! Frame sample and batch structures

use candle_core::Tensor;

use crate::compute::ComputeContext;
use crate::{Error, Result};

/// One training sample, channels-first and unbatched
///
/// `input` and every neighbor are `[3, h, w]`, flows are `[2, h, w]`,
/// `target` and `bicubic` are `[3, h * scale, w * scale]`.
#[derive(Clone, Debug)]
pub struct FrameSample {
    /// Low-resolution center frame
    pub input: Tensor,
    /// High-resolution ground truth for the center frame
    pub target: Tensor,
    /// Low-resolution neighboring frames
    pub neighbors: Vec<Tensor>,
    /// Motion flow from the center frame to each neighbor
    pub flows: Vec<Tensor>,
    /// Bicubic upsampling of the center frame
    pub bicubic: Tensor,
}

/// A training batch of stacked frame samples
///
/// Neighbor and flow counts are equal and fixed for a run.
#[derive(Clone, Debug)]
pub struct FrameBatch {
    /// Low-resolution input `[B, 3, h, w]`
    pub input: Tensor,
    /// High-resolution target `[B, 3, H, W]`
    pub target: Tensor,
    /// Neighboring frames, each `[B, 3, h, w]`
    pub neighbors: Vec<Tensor>,
    /// Flow fields, each `[B, 2, h, w]`
    pub flows: Vec<Tensor>,
    /// Bicubic reference `[B, 3, H, W]`
    pub bicubic: Tensor,
}

impl FrameBatch {
    /// Create a batch from already stacked tensors
    pub fn new(
        input: Tensor,
        target: Tensor,
        neighbors: Vec<Tensor>,
        flows: Vec<Tensor>,
        bicubic: Tensor,
    ) -> Self {
        Self {
            input,
            target,
            neighbors,
            flows,
            bicubic,
        }
    }

    /// Stack samples along a new leading batch dimension
    pub fn stack(samples: &[FrameSample]) -> Result<Self> {
        let first = samples
            .first()
            .ok_or_else(|| Error::Batch("cannot stack an empty list of samples".to_string()))?;
        let window = first.neighbors.len();
        if let Some(bad) = samples
            .iter()
            .find(|s| s.neighbors.len() != window || s.flows.len() != window)
        {
            return Err(Error::Batch(format!(
                "samples disagree on the frame window: expected {window} neighbors and flows, got {} and {}",
                bad.neighbors.len(),
                bad.flows.len()
            )));
        }

        let stack = |pick: &dyn Fn(&FrameSample) -> &Tensor| -> Result<Tensor> {
            let parts: Vec<&Tensor> = samples.iter().map(pick).collect();
            Ok(Tensor::stack(&parts, 0)?)
        };

        let neighbors = (0..window)
            .map(|i| stack(&|s| &s.neighbors[i]))
            .collect::<Result<Vec<_>>>()?;
        let flows = (0..window)
            .map(|i| stack(&|s| &s.flows[i]))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            input: stack(&|s| &s.input)?,
            target: stack(&|s| &s.target)?,
            neighbors,
            flows,
            bicubic: stack(&|s| &s.bicubic)?,
        })
    }

    /// Number of samples in the batch
    pub fn len(&self) -> Result<usize> {
        Ok(self.input.dim(0)?)
    }

    /// Whether the batch holds no samples
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Check the batch against the configured neighbor window
    pub fn validate(&self, expected_neighbors: usize) -> Result<()> {
        if self.neighbors.len() != expected_neighbors || self.flows.len() != expected_neighbors {
            return Err(Error::Batch(format!(
                "expected {expected_neighbors} neighbors and flows, got {} neighbors and {} flows",
                self.neighbors.len(),
                self.flows.len()
            )));
        }

        let batch = self.len()?;
        if batch == 0 {
            return Err(Error::Batch("batch holds no samples".to_string()));
        }
        let (_, _, h, w) = self.input.dims4()?;
        for (i, (neighbor, flow)) in self.neighbors.iter().zip(&self.flows).enumerate() {
            let (nb, _, nh, nw) = neighbor.dims4()?;
            let (fb, fc, fh, fw) = flow.dims4()?;
            if nb != batch || fb != batch || (nh, nw) != (h, w) || (fh, fw) != (h, w) {
                return Err(Error::Batch(format!(
                    "neighbor/flow {i} has shape {:?}/{:?}, input is {:?}",
                    neighbor.dims(),
                    flow.dims(),
                    self.input.dims()
                )));
            }
            if fc != 2 {
                return Err(Error::Batch(format!("flow {i} has {fc} channels, expected 2")));
            }
        }
        if self.target.dims() != self.bicubic.dims() {
            return Err(Error::Batch(format!(
                "target {:?} and bicubic {:?} differ in shape",
                self.target.dims(),
                self.bicubic.dims()
            )));
        }
        Ok(())
    }

    /// Move every tensor of the batch into a compute context
    pub fn to_compute(&self, ctx: &ComputeContext) -> Result<Self> {
        Ok(Self {
            input: ctx.place(&self.input)?,
            target: ctx.place(&self.target)?,
            neighbors: self
                .neighbors
                .iter()
                .map(|t| ctx.place(t))
                .collect::<Result<Vec<_>>>()?,
            flows: self
                .flows
                .iter()
                .map(|t| ctx.place(t))
                .collect::<Result<Vec<_>>>()?,
            bicubic: ctx.place(&self.bicubic)?,
        })
    }
}
