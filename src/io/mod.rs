//! Persistence: checkpoints, epoch reports and pretrained weights
//!
//! - Parameter snapshots as safetensors, one file per network per snapshot epoch
//! - The epoch report table as CSV
//! - Pretrained generator bootstrap with data-parallel key stripping

mod checkpoint;
mod pretrained;
mod report;
mod tensors;

pub use checkpoint::{checkpoint_path, save_checkpoint, NetKind};
pub use pretrained::{
    bootstrap_generator, load_into, strip_key_prefix, BootstrapOutcome, DATA_PARALLEL_PREFIX_LEN,
};
pub use report::{report_path, EpochReport, ReportRow};
pub use tensors::{read_tensors, summarize, TensorSummary};
