//! Progressive model training
//!
//! Drives a [`TrainableModel`](crate::model::TrainableModel) over the
//! infinite batch streams one epoch at a time, tracking per-epoch train and
//! validation loss and naming checkpoints after both.

mod checkpoint;
mod trainer;

pub use checkpoint::checkpoint_filename;
pub use trainer::{EpochMetrics, TrainConfig, TrainHistory, Trainer};
