//! Sequence model seam.
//!
//! The neural network that predicts next-token distributions is an external
//! collaborator; the pipeline only depends on the input/output contract
//! captured by these traits, never on the architecture behind them.

use std::path::Path;

use ndarray::Array2;

use crate::data::CaptionBatch;
use crate::vocab::TokenId;
use crate::Result;

/// Next-token prediction over a padded sequence.
///
/// Given an image embedding and a token-id sequence already left-padded to
/// `max_length`, returns one probability distribution over the vocabulary per
/// position: shape `[max_length, vocab_size]`. The decoder only reads the
/// last timestep.
pub trait SequenceModel {
    /// Predict per-position next-token distributions
    fn predict(&self, feature: &[f32], input_ids: &[TokenId]) -> Result<Array2<f32>>;
}

/// A sequence model that can also learn from batches and checkpoint itself.
pub trait TrainableModel: SequenceModel {
    /// Run one optimization step on a batch, returning the batch loss
    fn train_batch(&mut self, batch: &CaptionBatch) -> Result<f32>;

    /// Compute the loss on a batch without updating parameters
    fn eval_batch(&self, batch: &CaptionBatch) -> Result<f32>;

    /// Persist an opaque checkpoint; the pipeline never parses it back
    fn save(&self, path: &Path) -> Result<()>;
}
