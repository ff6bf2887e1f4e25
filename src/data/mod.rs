//! Progressive training-data generation
//!
//! The dataset never fits in memory at once, so training pulls from a lazy,
//! infinite [`BatchGenerator`] that materializes one [`CaptionBatch`] at a
//! time: a per-epoch random permutation over photos, one randomly drawn
//! caption per photo visit, next-token shifted and left-padded sequences,
//! one-hot expanded targets.

mod batch;
mod generator;

pub use batch::CaptionBatch;
pub use generator::BatchGenerator;

pub(crate) use generator::pad_left;
