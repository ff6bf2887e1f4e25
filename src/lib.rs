//! rotular: image-caption model training pipeline
//!
//! Trains and evaluates an image-captioning model end to end: cleaned caption
//! corpora, a frequency-thresholded vocabulary, memory-bounded progressive
//! batch generation, greedy autoregressive decoding, and corpus-level BLEU
//! scoring. The neural sequence model itself is an external collaborator
//! behind the [`SequenceModel`] trait; this crate supplies everything around
//! it.
//!
//! # Example
//!
//! ```
//! use rotular::text::CaptionCorpus;
//! use rotular::Vocabulary;
//!
//! let raw = "1.jpg#0\ta dog runs\n1.jpg#1\ta dog runs fast\n";
//! let corpus = CaptionCorpus::parse(raw);
//!
//! let vocab = Vocabulary::build(&corpus, 2);
//! assert_eq!(vocab.vocab_size(), 4); // {a, dog, runs} + padding id 0
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod decode;
pub mod eval;
pub mod features;
pub mod model;
pub mod text;
pub mod train;
pub mod vocab;

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// A photo id referenced by the caption dataset has no feature vector.
    /// Fatal: skipping it would corrupt batch shape guarantees.
    #[error("missing feature vector for photo '{0}'")]
    MissingFeature(String),

    /// A feature vector did not match the configured embedding dimension
    #[error("feature dimension mismatch for photo '{photo_id}': expected {expected}, got {got}")]
    FeatureDim {
        photo_id: String,
        expected: usize,
        got: usize,
    },

    /// A split manifest referenced a photo id with no captions
    #[error("split references unknown photo '{0}'")]
    UnknownPhoto(String),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Sequence model failure during training or decoding
    #[error("model error: {0}")]
    Model(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Result type for rotular operations
pub type Result<T> = std::result::Result<T, Error>;

pub use config::PipelineConfig;
pub use data::{BatchGenerator, CaptionBatch};
pub use decode::Decoder;
pub use eval::{corpus_bleu, EvalReport, Evaluator};
pub use features::FeatureStore;
pub use model::{SequenceModel, TrainableModel};
pub use text::{normalize_caption, parse_split, CaptionCorpus};
pub use train::{Trainer, TrainConfig};
pub use vocab::{TokenId, Vocabulary, END_TOKEN, PAD_ID, START_TOKEN};
