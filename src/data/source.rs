//! Batch sources consumed by the training loop

use super::batch::FrameBatch;
use crate::Result;

/// Yields the batches of one epoch at a time
///
/// Each call to [`BatchSource::epoch_batches`] starts a fresh pass, so a
/// source may reshuffle between epochs.
pub trait BatchSource {
    /// Number of batches one epoch yields
    fn num_batches(&self) -> usize;

    /// Batches of the next epoch, in training order
    fn epoch_batches(&mut self) -> Box<dyn Iterator<Item = Result<FrameBatch>> + '_>;
}

/// In-memory source replaying the same batches every epoch
#[derive(Clone, Debug, Default)]
pub struct VecSource {
    batches: Vec<FrameBatch>,
}

impl VecSource {
    /// Source over prebuilt batches
    pub fn new(batches: Vec<FrameBatch>) -> Self {
        Self { batches }
    }
}

impl BatchSource for VecSource {
    fn num_batches(&self) -> usize {
        self.batches.len()
    }

    fn epoch_batches(&mut self) -> Box<dyn Iterator<Item = Result<FrameBatch>> + '_> {
        Box::new(self.batches.iter().cloned().map(Ok))
    }
}
