//! Pretrained generator bootstrap
//!
//! Checkpoints written by data-parallel training prefix every parameter name
//! with `module.`. The prefix is cut by length, not by matching, so every
//! name loses its first [`DATA_PARALLEL_PREFIX_LEN`] characters.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use candle_core::Tensor;
use candle_nn::VarMap;

use super::tensors::read_tensors;
use crate::compute::ComputeContext;
use crate::{Error, Result};

/// Length of the `module.` prefix added by data-parallel wrappers
pub const DATA_PARALLEL_PREFIX_LEN: usize = 7;

/// What happened when bootstrapping the generator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Pretrained loading is switched off
    Disabled,
    /// The checkpoint does not exist; training starts from scratch
    Missing(PathBuf),
    /// Parameters were loaded
    Loaded {
        /// Checkpoint that was read
        path: PathBuf,
        /// Number of parameters written
        tensors: usize,
    },
}

/// Parameter name without its data-parallel prefix
pub fn strip_key_prefix(name: &str) -> &str {
    name.char_indices()
        .nth(DATA_PARALLEL_PREFIX_LEN)
        .map_or("", |(i, _)| &name[i..])
}

/// Strictly load named tensors into an existing parameter store
///
/// Fails without writing anything when a name is missing or unexpected, or
/// when a shape differs. Values are converted to each variable's dtype and
/// device.
pub fn load_into(vars: &VarMap, tensors: &BTreeMap<String, Tensor>, path: &Path) -> Result<usize> {
    let mismatch = |message: String| Error::CheckpointMismatch {
        path: path.to_path_buf(),
        message,
    };

    let data = vars
        .data()
        .lock()
        .map_err(|_| mismatch("parameter store lock is poisoned".to_string()))?;

    let expected: BTreeSet<&str> = data.keys().map(String::as_str).collect();
    let provided: BTreeSet<&str> = tensors.keys().map(String::as_str).collect();
    let missing: Vec<&str> = expected.difference(&provided).copied().collect();
    let unexpected: Vec<&str> = provided.difference(&expected).copied().collect();
    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(mismatch(format!(
            "missing parameters {missing:?}, unexpected parameters {unexpected:?}"
        )));
    }

    for (name, var) in data.iter() {
        let tensor = &tensors[name];
        if tensor.dims() != var.dims() {
            return Err(mismatch(format!(
                "parameter `{name}` has shape {:?}, expected {:?}",
                tensor.dims(),
                var.dims()
            )));
        }
    }

    for (name, var) in data.iter() {
        let value = tensors[name].to_dtype(var.dtype())?.to_device(var.device())?;
        var.set(&value)?;
    }
    Ok(data.len())
}

/// Load a data-parallel generator checkpoint if one is configured and present
pub fn bootstrap_generator(
    enabled: bool,
    path: &Path,
    vars: &VarMap,
    compute: &ComputeContext,
) -> Result<BootstrapOutcome> {
    if !enabled {
        return Ok(BootstrapOutcome::Disabled);
    }
    if !path.exists() {
        tracing::warn!("Couldn't find pre-trained SR model at: {}", path.display());
        return Ok(BootstrapOutcome::Missing(path.to_path_buf()));
    }

    let raw = read_tensors(path, compute.device())?;
    let mut stripped = BTreeMap::new();
    for (name, tensor) in raw {
        let key = strip_key_prefix(&name);
        if !name.starts_with("module.") {
            tracing::debug!("Parameter `{name}` has no `module.` prefix, stripped to `{key}`");
        }
        stripped.insert(key.to_string(), tensor);
    }

    let tensors = load_into(vars, &stripped, path)?;
    tracing::info!("Pre-trained SR model loaded from: {}", path.display());
    Ok(BootstrapOutcome::Loaded {
        path: path.to_path_buf(),
        tensors,
    })
}
