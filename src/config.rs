//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::features::DEFAULT_FEATURE_DIM;
use crate::{Error, Result};

/// Immutable pipeline configuration, validated at construction.
///
/// Collects the knobs that the training and evaluation stages share: the
/// vocabulary frequency threshold, photos per batch, epoch count, embedding
/// width, and an optional RNG seed for reproducible runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum corpus-wide occurrence count for a token to enter the vocabulary
    pub min_frequency: usize,
    /// Photos per training batch
    pub num_photos: usize,
    /// Number of training epochs
    pub epochs: usize,
    /// Image embedding width
    pub feature_dim: usize,
    /// RNG seed for batch shuffling; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_frequency: 2,
            num_photos: 32,
            epochs: 20,
            feature_dim: DEFAULT_FEATURE_DIM,
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// Set the vocabulary frequency threshold
    pub fn with_min_frequency(mut self, min_frequency: usize) -> Self {
        self.min_frequency = min_frequency;
        self
    }

    /// Set photos per batch
    pub fn with_num_photos(mut self, num_photos: usize) -> Self {
        self.num_photos = num_photos;
        self
    }

    /// Set the epoch count
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the embedding width
    pub fn with_feature_dim(mut self, feature_dim: usize) -> Self {
        self.feature_dim = feature_dim;
        self
    }

    /// Fix the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.min_frequency == 0 {
            return Err(Error::Config("min_frequency must be at least 1".into()));
        }
        if self.num_photos == 0 {
            return Err(Error::Config("num_photos must be at least 1".into()));
        }
        if self.feature_dim == 0 {
            return Err(Error::Config("feature_dim must be nonzero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.min_frequency, 2);
        assert_eq!(config.num_photos, 32);
        assert_eq!(config.epochs, 20);
        assert_eq!(config.feature_dim, 4096);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = PipelineConfig::default()
            .with_min_frequency(3)
            .with_num_photos(8)
            .with_epochs(2)
            .with_feature_dim(16)
            .with_seed(7);

        assert_eq!(config.min_frequency, 3);
        assert_eq!(config.num_photos, 8);
        assert_eq!(config.epochs, 2);
        assert_eq!(config.feature_dim, 16);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let err = PipelineConfig::default().with_num_photos(0).validate();
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_frequency() {
        let err = PipelineConfig::default().with_min_frequency(0).validate();
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_feature_dim() {
        let err = PipelineConfig::default().with_feature_dim(0).validate();
        assert!(matches!(err, Err(Error::Config(_))));
    }
}
