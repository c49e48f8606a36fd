//! Unit tests for configuration validation

use super::error::ValidationError;
use super::validator::{validate_config, validate_paths};
use crate::config::schema::*;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_default_config_is_valid() {
    assert!(validate_config(&TrainSpec::default()).is_ok());
}

#[test]
fn test_invalid_batch_size() {
    let mut spec = TrainSpec::default();
    spec.data.batch_size = 0;
    assert_eq!(
        validate_config(&spec),
        Err(ValidationError::InvalidBatchSize(0))
    );
}

#[test]
fn test_invalid_learning_rate() {
    let mut spec = TrainSpec::default();
    spec.optimizer.lr = 0.0;
    assert!(matches!(
        validate_config(&spec),
        Err(ValidationError::InvalidLearningRate(_))
    ));

    spec.optimizer.lr = 1.5;
    assert!(matches!(
        validate_config(&spec),
        Err(ValidationError::InvalidLearningRate(_))
    ));

    spec.optimizer.lr = f64::NAN;
    assert!(matches!(
        validate_config(&spec),
        Err(ValidationError::InvalidLearningRate(_))
    ));
}

#[test]
fn test_invalid_beta() {
    let mut spec = TrainSpec::default();
    spec.optimizer.beta2 = 1.0;
    assert_eq!(validate_config(&spec), Err(ValidationError::InvalidBeta(1.0)));
}

#[test]
fn test_zero_epochs() {
    let mut spec = TrainSpec::default();
    spec.training.n_epochs = 0;
    assert_eq!(validate_config(&spec), Err(ValidationError::InvalidEpochs(0)));
}

#[test]
fn test_start_epoch_range() {
    let mut spec = TrainSpec::default();
    spec.training.start_epoch = 0;
    assert!(matches!(
        validate_config(&spec),
        Err(ValidationError::InvalidStartEpoch { start: 0, .. })
    ));

    spec.training.start_epoch = 151;
    assert!(matches!(
        validate_config(&spec),
        Err(ValidationError::InvalidStartEpoch { start: 151, n_epochs: 150 })
    ));

    spec.training.start_epoch = 150;
    assert!(validate_config(&spec).is_ok());
}

#[test]
fn test_frame_window() {
    let mut spec = TrainSpec::default();
    spec.data.n_frames = 1;
    assert_eq!(
        validate_config(&spec),
        Err(ValidationError::InvalidFrameCount(1))
    );

    spec.data.n_frames = 4;
    assert_eq!(
        validate_config(&spec),
        Err(ValidationError::EvenCenteredWindow(4))
    );

    spec.data.future_frame = false;
    assert!(validate_config(&spec).is_ok());
}

#[test]
fn test_zero_width() {
    let mut spec = TrainSpec::default();
    spec.model.critic_blocks = 0;
    assert_eq!(
        validate_config(&spec),
        Err(ValidationError::InvalidWidth {
            name: "critic_blocks",
            value: 0
        })
    );
}

#[test]
fn test_snapshots_and_prefix() {
    let mut spec = TrainSpec::default();
    spec.checkpoint.snapshots = 0;
    assert_eq!(
        validate_config(&spec),
        Err(ValidationError::InvalidSnapshots(0))
    );

    let mut spec = TrainSpec::default();
    spec.checkpoint.prefix.clear();
    assert_eq!(validate_config(&spec), Err(ValidationError::EmptyPrefix));
}

#[test]
fn test_paths_missing_data_dir() {
    let mut spec = TrainSpec::default();
    spec.data.data_dir = PathBuf::from("/nonexistent/sequences");
    assert!(matches!(
        validate_paths(&spec),
        Err(ValidationError::DataDirNotFound(_))
    ));
}

#[test]
fn test_paths_file_list_required_unless_other_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let mut spec = TrainSpec::default();
    spec.data.data_dir = dir.path().to_path_buf();

    assert!(matches!(
        validate_paths(&spec),
        Err(ValidationError::FileListNotFound(_))
    ));

    spec.data.other_dataset = true;
    assert!(validate_paths(&spec).is_ok());

    spec.data.other_dataset = false;
    fs::write(dir.path().join("sep_trainlist.txt"), "00001/0001\n").unwrap();
    assert!(validate_paths(&spec).is_ok());
}

#[test]
fn test_paths_vgg_weights() {
    let dir = tempfile::tempdir().unwrap();
    let mut spec = TrainSpec::default();
    spec.data.data_dir = dir.path().to_path_buf();
    spec.data.other_dataset = true;
    spec.model.vgg_weights = Some(dir.path().join("vgg16.safetensors"));
    assert!(matches!(
        validate_paths(&spec),
        Err(ValidationError::VggWeightsNotFound(_))
    ));
}
