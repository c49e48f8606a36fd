//! Declarative training configuration
//!
//! A YAML [`TrainSpec`] (every field optional), command-line overrides,
//! validation and the builder that turns a spec into a
//! [`TrainingSession`](crate::train::TrainingSession).

mod builder;
mod cli;
mod schema;
mod train;
mod validate;

pub use builder::{build_loss, build_optimizer_config, build_session};
pub use cli::{
    apply_overrides, parse_args, Cli, Command, InspectArgs, OutputFormat, TrainArgs, ValidateArgs,
};
pub use schema::{CheckpointSpec, DataSpec, ModelSpec, OptimSpec, TrainSpec, TrainingParams};
pub use train::{train_from_spec, train_from_yaml};
pub use validate::{validate_config, validate_paths, ValidationError};

use crate::Result;
use std::path::Path;

/// Load a training spec from a YAML file and validate its settings
///
/// Input paths are not checked; call [`validate_paths`] before training.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<TrainSpec> {
    let spec = TrainSpec::load(config_path)?;
    validate_config(&spec)?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::fs;

    #[test]
    fn test_load_config_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "data:\n  batch_size: 0\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidBatchSize(0))
        ));
    }

    #[test]
    fn test_load_config_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.yaml");
        fs::write(&path, "training:\n  n_epochs: 4\n").unwrap();
        assert_eq!(load_config(&path).unwrap().training.n_epochs, 4);
    }
}
