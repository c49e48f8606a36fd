//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::TrainSpec;

/// Validate the numeric and structural settings of a [`TrainSpec`]
///
/// Paths are not touched; see [`validate_paths`].
pub fn validate_config(spec: &TrainSpec) -> Result<(), ValidationError> {
    if spec.model.upscale == 0 {
        return Err(ValidationError::InvalidUpscale(spec.model.upscale));
    }

    let widths = [
        ("features", spec.model.features),
        ("hr_features", spec.model.hr_features),
        ("critic_features", spec.model.critic_features),
        ("critic_blocks", spec.model.critic_blocks),
    ];
    if let Some((name, value)) = widths.into_iter().find(|(_, v)| *v == 0) {
        return Err(ValidationError::InvalidWidth { name, value });
    }

    if spec.data.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(spec.data.batch_size));
    }

    if spec.data.n_frames < 2 {
        return Err(ValidationError::InvalidFrameCount(spec.data.n_frames));
    }
    if spec.data.future_frame && spec.data.n_frames % 2 == 0 {
        return Err(ValidationError::EvenCenteredWindow(spec.data.n_frames));
    }

    if spec.data.threads == 0 {
        return Err(ValidationError::InvalidThreads(spec.data.threads));
    }

    let lr = spec.optimizer.lr;
    if !(lr > 0.0 && lr <= 1.0) {
        return Err(ValidationError::InvalidLearningRate(lr));
    }
    for beta in [spec.optimizer.beta1, spec.optimizer.beta2] {
        if !(0.0..1.0).contains(&beta) {
            return Err(ValidationError::InvalidBeta(beta));
        }
    }
    if !(spec.optimizer.eps > 0.0) {
        return Err(ValidationError::InvalidEpsilon(spec.optimizer.eps));
    }

    if spec.training.n_epochs == 0 {
        return Err(ValidationError::InvalidEpochs(spec.training.n_epochs));
    }
    let start = spec.training.start_epoch;
    if start == 0 || start > spec.training.n_epochs {
        return Err(ValidationError::InvalidStartEpoch {
            start,
            n_epochs: spec.training.n_epochs,
        });
    }

    if spec.checkpoint.snapshots == 0 {
        return Err(ValidationError::InvalidSnapshots(spec.checkpoint.snapshots));
    }
    if spec.checkpoint.prefix.is_empty() {
        return Err(ValidationError::EmptyPrefix);
    }

    Ok(())
}

/// Check that every input path named by a [`TrainSpec`] exists
pub fn validate_paths(spec: &TrainSpec) -> Result<(), ValidationError> {
    if !spec.data.data_dir.is_dir() {
        return Err(ValidationError::DataDirNotFound(
            spec.data.data_dir.display().to_string(),
        ));
    }

    if !spec.data.other_dataset {
        let list = spec.data.data_dir.join(&spec.data.file_list);
        if !list.is_file() {
            return Err(ValidationError::FileListNotFound(list.display().to_string()));
        }
    }

    if let Some(vgg) = &spec.model.vgg_weights {
        if !vgg.is_file() {
            return Err(ValidationError::VggWeightsNotFound(vgg.display().to_string()));
        }
    }

    Ok(())
}
