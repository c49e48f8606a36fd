//! YAML schema definitions for declarative training configuration

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::DatasetConfig;
use crate::models::{CriticConfig, GeneratorConfig};
use crate::train::{LoopConfig, MetricWeighting, NonFinitePolicy, StepConfig};
use crate::{Error, Result};

/// Deserialize a bool from either a YAML boolean (`true`) or a quoted string (`"true"`).
fn deserialize_bool_lenient<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::Str(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected 'true' or 'false', got '{other}'"
            ))),
        },
    }
}

/// Complete training specification
///
/// Every section is optional in YAML; missing fields take the defaults of
/// the reference Vimeo-90k run (4x, 7 frames, 150 epochs).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainSpec {
    /// Networks and loss selection
    pub model: ModelSpec,

    /// Dataset location and sampling
    pub data: DataSpec,

    /// Adam hyperparameters
    pub optimizer: OptimSpec,

    /// Epoch loop and numerics
    pub training: TrainingParams,

    /// Snapshots, reports and pretrained bootstrap
    pub checkpoint: CheckpointSpec,
}

/// Networks and loss selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSpec {
    /// Spatial upscale factor
    pub upscale: usize,

    /// Add the bicubic reference to the generator output
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub residual: bool,

    /// Train with plain L1 reconstruction instead of the composite loss
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub use_l1_loss: bool,

    /// Generator low-resolution feature width
    pub features: usize,

    /// Generator high-resolution feature width per projection
    pub hr_features: usize,

    /// Discriminator width of the first block
    pub critic_features: usize,

    /// Discriminator stride-2 blocks
    pub critic_blocks: usize,

    /// VGG16 weights for the perceptual term (omitted: no perceptual term)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vgg_weights: Option<PathBuf>,
}

impl Default for ModelSpec {
    fn default() -> Self {
        let generator = GeneratorConfig::default();
        let critic = CriticConfig::default();
        Self {
            upscale: generator.upscale,
            residual: false,
            use_l1_loss: false,
            features: generator.features,
            hr_features: generator.hr_features,
            critic_features: critic.features,
            critic_blocks: critic.blocks,
            vgg_weights: None,
        }
    }
}

/// Dataset location and sampling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSpec {
    /// Root directory of the packed samples
    pub data_dir: PathBuf,

    /// Sample list, relative to `data_dir`
    pub file_list: PathBuf,

    /// Use every sample under `data_dir` instead of `file_list`
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub other_dataset: bool,

    /// Center the window on the target frame
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub future_frame: bool,

    /// Frames per window, target included
    pub n_frames: usize,

    /// Low-resolution crop size (0 keeps the full frame)
    pub patch_size: usize,

    /// Random flips
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub augmentation: bool,

    /// Samples per batch
    pub batch_size: usize,

    /// Samples per evaluation batch (reserved)
    pub test_batch_size: usize,

    /// Worker threads used to decode samples
    pub threads: usize,
}

impl Default for DataSpec {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./vimeo_septuplet/sequences"),
            file_list: PathBuf::from("sep_trainlist.txt"),
            other_dataset: false,
            future_frame: true,
            n_frames: 7,
            patch_size: 64,
            augmentation: true,
            batch_size: 2,
            test_batch_size: 5,
            threads: 8,
        }
    }
}

/// Adam hyperparameters shared by both networks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimSpec {
    /// Initial learning rate of both optimizers
    pub lr: f64,
    /// First moment decay
    pub beta1: f64,
    /// Second moment decay
    pub beta2: f64,
    /// Denominator epsilon
    pub eps: f64,
}

impl Default for OptimSpec {
    fn default() -> Self {
        Self {
            lr: 1e-4,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
        }
    }
}

/// Epoch loop and numerics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    /// First epoch (1-based)
    pub start_epoch: usize,

    /// Last epoch, inclusive
    pub n_epochs: usize,

    /// Prefer a CUDA device when one is available
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub gpu_mode: bool,

    /// Seed for shuffling, cropping, flipping and the device RNG
    pub seed: u64,

    /// Drop the first batch of every epoch
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub skip_first_batch: bool,

    /// Sample count used to weight each batch in the epoch metrics
    pub metric_weighting: MetricWeighting,

    /// Reaction to a NaN or infinite loss
    pub non_finite: NonFinitePolicy,

    /// Debug-level logging
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub debug: bool,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            start_epoch: 1,
            n_epochs: 150,
            gpu_mode: true,
            seed: 123,
            skip_first_batch: true,
            metric_weighting: MetricWeighting::Configured,
            non_finite: NonFinitePolicy::Abort,
            debug: false,
        }
    }
}

/// Snapshots, reports and pretrained bootstrap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointSpec {
    /// Directory for `netG`/`netD` snapshots and the pretrained file
    pub save_folder: PathBuf,

    /// Directory for the per-epoch report
    pub statistics_dir: PathBuf,

    /// Report file name prefix
    pub prefix: String,

    /// Snapshot cadence in epochs
    pub snapshots: usize,

    /// Load `pretrained_sr` into the generator before training
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub pretrained: bool,

    /// Pretrained generator file, relative to `save_folder`
    pub pretrained_sr: PathBuf,
}

impl Default for CheckpointSpec {
    fn default() -> Self {
        Self {
            save_folder: PathBuf::from("weights"),
            statistics_dir: PathBuf::from("statistics"),
            prefix: "F7".to_string(),
            snapshots: 1,
            pretrained: false,
            pretrained_sr: PathBuf::from("RBPN_4x.safetensors"),
        }
    }
}

impl TrainSpec {
    /// Parse a spec from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))
    }

    /// Read and parse a YAML file (no validation)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml(&yaml)
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))
    }

    /// Neighbor frames per sample
    pub fn neighbors(&self) -> usize {
        self.data.n_frames.saturating_sub(1)
    }

    /// Epoch loop settings
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            start_epoch: self.training.start_epoch,
            n_epochs: self.training.n_epochs,
            batch_size: self.data.batch_size,
            skip_first_batch: self.training.skip_first_batch,
            metric_weighting: self.training.metric_weighting,
        }
    }

    /// Per-step settings
    pub fn step_config(&self) -> StepConfig {
        StepConfig {
            residual: self.model.residual,
            neighbors: self.neighbors(),
            non_finite: self.training.non_finite,
        }
    }

    /// Dataset reader settings
    pub fn dataset_config(&self) -> DatasetConfig {
        DatasetConfig {
            data_dir: self.data.data_dir.clone(),
            file_list: self.data.file_list.clone(),
            other_dataset: self.data.other_dataset,
            future_frame: self.data.future_frame,
            n_frames: self.data.n_frames,
            upscale: self.model.upscale,
            patch_size: self.data.patch_size,
            augmentation: self.data.augmentation,
            batch_size: self.data.batch_size,
            threads: self.data.threads,
            seed: self.training.seed,
        }
    }

    /// Generator shape
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            upscale: self.model.upscale,
            neighbors: self.neighbors(),
            features: self.model.features,
            hr_features: self.model.hr_features,
        }
    }

    /// Discriminator shape
    pub fn critic_config(&self) -> CriticConfig {
        CriticConfig {
            features: self.model.critic_features,
            blocks: self.model.critic_blocks,
        }
    }

    /// Full path of the pretrained generator file
    pub fn pretrained_path(&self) -> PathBuf {
        self.checkpoint.save_folder.join(&self.checkpoint.pretrained_sr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let spec = TrainSpec::from_yaml("{}").unwrap();
        assert_eq!(spec, TrainSpec::default());
        assert_eq!(spec.model.upscale, 4);
        assert_eq!(spec.data.batch_size, 2);
        assert_eq!(spec.data.n_frames, 7);
        assert_eq!(spec.training.n_epochs, 150);
        assert_eq!(spec.training.seed, 123);
        assert_eq!(spec.checkpoint.prefix, "F7");
        assert!((spec.optimizer.lr - 1e-4).abs() < 1e-12);
    }

    #[test]
    fn test_partial_sections() {
        let yaml = r#"
model:
  upscale: 2
  use_l1_loss: "true"
data:
  n_frames: 3
  future_frame: false
training:
  n_epochs: 10
  metric_weighting: actual
  non_finite: skip
checkpoint:
  snapshots: 5
"#;
        let spec = TrainSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.model.upscale, 2);
        assert!(spec.model.use_l1_loss);
        assert_eq!(spec.neighbors(), 2);
        assert_eq!(spec.training.metric_weighting, MetricWeighting::Actual);
        assert_eq!(spec.training.non_finite, NonFinitePolicy::Skip);
        assert_eq!(spec.checkpoint.snapshots, 5);
        // untouched fields keep their defaults
        assert_eq!(spec.data.patch_size, 64);
        assert_eq!(spec.checkpoint.save_folder, PathBuf::from("weights"));
    }

    #[test]
    fn test_lenient_bool_rejects_garbage() {
        let err = TrainSpec::from_yaml("model:\n  residual: \"maybe\"\n").unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn test_derived_configs() {
        let mut spec = TrainSpec::default();
        spec.model.residual = true;
        spec.training.start_epoch = 3;

        let step = spec.step_config();
        assert!(step.residual);
        assert_eq!(step.neighbors, 6);

        let lc = spec.loop_config();
        assert_eq!(lc.start_epoch, 3);
        assert_eq!(lc.batch_size, 2);
        assert!(lc.skip_first_batch);

        let gc = spec.generator_config();
        assert_eq!(gc.neighbors, 6);
        assert_eq!(gc.upscale, 4);

        let dc = spec.dataset_config();
        assert_eq!(dc.seed, 123);
        assert_eq!(dc.upscale, 4);
    }

    #[test]
    fn test_pretrained_path_joins_save_folder() {
        let spec = TrainSpec::default();
        assert_eq!(
            spec.pretrained_path(),
            PathBuf::from("weights").join("RBPN_4x.safetensors")
        );
    }

    #[test]
    fn test_yaml_roundtrip_preserves_spec() {
        let mut spec = TrainSpec::default();
        spec.model.vgg_weights = Some(PathBuf::from("vgg16.safetensors"));
        let back = TrainSpec::from_yaml(&spec.to_yaml().unwrap()).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_load_missing_file() {
        let err = TrainSpec::load("/nonexistent/config.yaml").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
