//! Epoch-level training driver.

use std::path::PathBuf;

use crate::data::BatchGenerator;
use crate::model::TrainableModel;
use crate::{Error, Result};

use super::checkpoint::checkpoint_filename;

/// Training-loop configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Number of epochs to run
    pub epochs: usize,
    /// Directory for per-epoch checkpoints; `None` disables checkpointing
    pub checkpoint_dir: Option<PathBuf>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 20,
            checkpoint_dir: None,
        }
    }
}

impl TrainConfig {
    /// Set the epoch count
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Enable checkpointing into a directory
    pub fn with_checkpoint_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.checkpoint_dir = Some(dir.into());
        self
    }
}

/// Losses recorded for one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochMetrics {
    /// Epoch index, starting at 0
    pub epoch: usize,
    /// Mean training-batch loss
    pub train_loss: f32,
    /// Mean validation-batch loss
    pub val_loss: f32,
}

/// Loss history across a training run.
#[derive(Debug, Clone, Default)]
pub struct TrainHistory {
    /// Per-epoch metrics in epoch order
    pub epochs: Vec<EpochMetrics>,
}

impl TrainHistory {
    /// The epoch with the lowest validation loss
    pub fn best_epoch(&self) -> Option<&EpochMetrics> {
        self.epochs
            .iter()
            .min_by(|a, b| a.val_loss.total_cmp(&b.val_loss))
    }
}

/// Progressive trainer: pulls from the lazy batch streams so only one batch
/// is resident at a time, alternating strictly between production and
/// consumption.
///
/// Training and validation must be fed by independent generator instances;
/// a shared iterator would interleave the two epoch walks.
pub struct Trainer {
    config: TrainConfig,
}

impl Trainer {
    /// Create a trainer
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the configured number of epochs.
    ///
    /// Each epoch pulls `steps_per_epoch` batches from the training stream
    /// and the same measure from the validation stream, then writes a
    /// checkpoint named after the epoch and both losses. One-shot: the first
    /// model or generator error aborts the run.
    pub fn fit<M: TrainableModel>(
        &self,
        model: &mut M,
        train: &mut BatchGenerator<'_>,
        val: &mut BatchGenerator<'_>,
    ) -> Result<TrainHistory> {
        let train_steps = train.steps_per_epoch().max(1);
        let val_steps = val.steps_per_epoch().max(1);

        let mut history = TrainHistory::default();
        for epoch in 0..self.config.epochs {
            let train_loss = Self::run_steps(train, train_steps, |batch| model.train_batch(batch))?;
            let val_loss = Self::run_steps(val, val_steps, |batch| model.eval_batch(batch))?;

            history.epochs.push(EpochMetrics {
                epoch,
                train_loss,
                val_loss,
            });

            if let Some(dir) = &self.config.checkpoint_dir {
                let path = dir.join(checkpoint_filename(epoch, train_loss, val_loss));
                model.save(&path)?;
            }
        }

        Ok(history)
    }

    fn run_steps(
        stream: &mut BatchGenerator<'_>,
        steps: usize,
        mut step_fn: impl FnMut(&crate::data::CaptionBatch) -> Result<f32>,
    ) -> Result<f32> {
        let mut total = 0.0;
        for _ in 0..steps {
            let batch = stream
                .next()
                .ok_or_else(|| Error::Model("batch stream ended unexpectedly".into()))??;
            total += step_fn(&batch)?;
        }
        Ok(total / steps as f32)
    }
}
