//! Packed frame samples on disk
//!
//! Each sample is one safetensors file holding channels-first `f32` tensors:
//! - `input` - low-resolution center frame `[3, h, w]`
//! - `target` - high-resolution center frame `[3, h * s, w * s]`
//! - `bicubic` - bicubic upsampling of `input`, same shape as `target`
//! - `neighbor.<offset>` / `flow.<offset>` - one frame and one `[2, h, w]`
//!   flow field per window offset, relative to the center frame
//!
//! With `other_dataset` every `*.safetensors` file directly under `data_dir`
//! is a sample. Otherwise `data_dir/file_list` lists one sample per line,
//! relative to `data_dir` (the `.safetensors` extension may be omitted).

use std::path::{Path, PathBuf};

use candle_core::{DType, Device};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPool;

use super::augment::{augment, random_crop, CropWindow};
use super::batch::{FrameBatch, FrameSample};
use super::source::BatchSource;
use crate::config::TrainSpec;
use crate::io::read_tensors;
use crate::{Error, Result};

/// Where samples live and how they are turned into batches
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetConfig {
    /// Root directory of the samples
    pub data_dir: PathBuf,
    /// Sample list, relative to `data_dir`
    pub file_list: PathBuf,
    /// Scan `data_dir` instead of reading `file_list`
    pub other_dataset: bool,
    /// Center the window on the target frame
    pub future_frame: bool,
    /// Frames per window, target included
    pub n_frames: usize,
    /// Spatial upscale factor
    pub upscale: usize,
    /// Low-resolution crop size (0 keeps whole frames)
    pub patch_size: usize,
    /// Random flips
    pub augmentation: bool,
    /// Samples per batch
    pub batch_size: usize,
    /// Worker threads decoding samples
    pub threads: usize,
    /// Seed for shuffling, crops and flips
    pub seed: u64,
}

/// Frame offsets of the neighbors, relative to the target frame
///
/// With `future_frame` the window is centered: `-t..=t` without 0, where
/// `t = n_frames / 2`. Otherwise it is the `n_frames - 1` preceding frames.
pub fn neighbor_offsets(n_frames: usize, future_frame: bool) -> Vec<i64> {
    if future_frame {
        let t = (n_frames / 2) as i64;
        (-t..=t).filter(|o| *o != 0).collect()
    } else {
        (1..n_frames as i64).map(|o| -o).collect()
    }
}

/// Safetensors samples decoded on a worker pool
pub struct PackedFrameDataset {
    config: DatasetConfig,
    samples: Vec<PathBuf>,
    offsets: Vec<i64>,
    rng: StdRng,
    pool: ThreadPool,
}

impl PackedFrameDataset {
    /// Open the dataset described by a training spec
    pub fn from_spec(spec: &TrainSpec) -> Result<Self> {
        Self::open(spec.dataset_config())
    }

    /// Index the samples and start the worker pool
    pub fn open(config: DatasetConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(Error::Dataset("batch size must be at least 1".to_string()));
        }
        let samples = if config.other_dataset {
            scan_dir(&config.data_dir)?
        } else {
            read_list(&config.data_dir, &config.file_list)?
        };
        if samples.is_empty() {
            return Err(Error::Dataset(format!(
                "no samples found under {}",
                config.data_dir.display()
            )));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads.max(1))
            .build()
            .map_err(|e| Error::Dataset(format!("failed to start data workers: {e}")))?;

        tracing::info!(
            "Dataset: {} samples from {}, {} batches of {}",
            samples.len(),
            config.data_dir.display(),
            samples.len().div_ceil(config.batch_size),
            config.batch_size
        );

        Ok(Self {
            offsets: neighbor_offsets(config.n_frames, config.future_frame),
            rng: StdRng::seed_from_u64(config.seed),
            samples,
            pool,
            config,
        })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the dataset has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Neighbor offsets read from every sample
    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    /// Decode one sample file into CPU tensors
    pub fn load_sample(&self, path: &Path) -> Result<FrameSample> {
        let mut tensors = read_tensors(path, &Device::Cpu)?;
        let mut take = |key: String| -> Result<_> {
            let tensor = tensors.remove(&key).ok_or_else(|| {
                Error::Dataset(format!("sample {} has no tensor `{key}`", path.display()))
            })?;
            Ok(tensor.to_dtype(DType::F32)?)
        };

        let input = take("input".to_string())?;
        let target = take("target".to_string())?;
        let bicubic = take("bicubic".to_string())?;
        let mut neighbors = Vec::with_capacity(self.offsets.len());
        let mut flows = Vec::with_capacity(self.offsets.len());
        for offset in &self.offsets {
            neighbors.push(take(format!("neighbor.{offset}"))?);
            flows.push(take(format!("flow.{offset}"))?);
        }

        Ok(FrameSample {
            input,
            target,
            neighbors,
            flows,
            bicubic,
        })
    }

    fn prepare(&self, path: &Path, seed: u64) -> Result<FrameSample> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sample = self.load_sample(path)?;
        if self.config.patch_size > 0 {
            let (_, h, w) = sample.input.dims3()?;
            let window = CropWindow::random(&mut rng, h, w, self.config.patch_size)?;
            sample = random_crop(&sample, window, self.config.upscale)?;
        }
        if self.config.augmentation {
            sample = augment(sample, &mut rng)?;
        }
        Ok(sample)
    }

    fn load_batch(&self, chunk: &[(PathBuf, u64)]) -> Result<FrameBatch> {
        let samples = self.pool.install(|| {
            chunk
                .par_iter()
                .map(|(path, seed)| self.prepare(path, *seed))
                .collect::<Result<Vec<_>>>()
        })?;
        FrameBatch::stack(&samples)
    }

    /// Shuffled sample order of the next epoch, chunked into batches, with
    /// one derived seed per sample
    fn plan_epoch(&mut self) -> Vec<Vec<(PathBuf, u64)>> {
        let mut order: Vec<usize> = (0..self.samples.len()).collect();
        order.shuffle(&mut self.rng);
        order
            .chunks(self.config.batch_size)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|i| (self.samples[*i].clone(), self.rng.random::<u64>()))
                    .collect()
            })
            .collect()
    }
}

impl BatchSource for PackedFrameDataset {
    fn num_batches(&self) -> usize {
        self.samples.len().div_ceil(self.config.batch_size)
    }

    fn epoch_batches(&mut self) -> Box<dyn Iterator<Item = Result<FrameBatch>> + '_> {
        let plan = self.plan_epoch();
        let this: &Self = self;
        Box::new(plan.into_iter().map(move |chunk| this.load_batch(&chunk)))
    }
}

fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut samples = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "safetensors") {
            samples.push(path);
        }
    }
    samples.sort();
    Ok(samples)
}

fn read_list(data_dir: &Path, file_list: &Path) -> Result<Vec<PathBuf>> {
    let list = data_dir.join(file_list);
    let content = std::fs::read_to_string(&list).map_err(|e| {
        Error::Dataset(format!("cannot read sample list {}: {e}", list.display()))
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let path = data_dir.join(line);
            if path.extension().is_none() {
                path.with_extension("safetensors")
            } else {
                path
            }
        })
        .collect())
}
