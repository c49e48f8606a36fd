//! Parameter snapshots

use std::fmt;
use std::path::{Path, PathBuf};

use candle_nn::VarMap;

use crate::Result;

/// Which network a checkpoint belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetKind {
    /// Generator, files named `netG_*`
    Generator,
    /// Discriminator, files named `netD_*`
    Discriminator,
}

impl fmt::Display for NetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetKind::Generator => write!(f, "netG"),
            NetKind::Discriminator => write!(f, "netD"),
        }
    }
}

/// `<save_folder>/<net>_epoch_<upscale>_<epoch>.safetensors`
pub fn checkpoint_path(save_folder: &Path, net: NetKind, upscale: usize, epoch: usize) -> PathBuf {
    save_folder.join(format!("{net}_epoch_{upscale}_{epoch}.safetensors"))
}

/// Write every variable of `vars` to `path`, creating parent directories
pub fn save_checkpoint(vars: &VarMap, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    vars.save(path)?;
    Ok(())
}
