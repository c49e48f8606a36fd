//! Training data: frame batches and the sources that produce them
//!
//! - [`FrameBatch`] - stacked input, target, neighbors, flows and bicubic reference
//! - [`BatchSource`] - one pass of batches per epoch
//! - [`PackedFrameDataset`] - safetensors samples on disk, cropped and augmented

mod augment;
mod batch;
mod dataset;
mod source;

pub use augment::{augment, flip_horizontal, flip_vertical, random_crop, CropWindow};
pub use batch::{FrameBatch, FrameSample};
pub use dataset::{neighbor_offsets, DatasetConfig, PackedFrameDataset};
pub use source::{BatchSource, VecSource};
