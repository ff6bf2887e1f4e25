//! Feature store: photo id -> fixed-length image embedding.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Embedding width produced by the external CNN encoder
pub const DEFAULT_FEATURE_DIM: usize = 4096;

/// Read-only map from photo identifier to a fixed-length embedding vector.
///
/// Vectors are produced once by the external feature-extraction collaborator
/// and are immutable afterward; training and decoding only read. Every photo
/// id referenced by a caption dataset must resolve here — a miss is fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureStore {
    dim: usize,
    features: HashMap<String, Vec<f32>>,
}

impl FeatureStore {
    /// Create an empty store for `dim`-wide vectors
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            features: HashMap::new(),
        }
    }

    /// Embedding width
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Insert one feature vector, checking the dimension
    pub fn insert(&mut self, photo_id: impl Into<String>, feature: Vec<f32>) -> Result<()> {
        let photo_id = photo_id.into();
        if feature.len() != self.dim {
            return Err(Error::FeatureDim {
                photo_id,
                expected: self.dim,
                got: feature.len(),
            });
        }
        self.features.insert(photo_id, feature);
        Ok(())
    }

    /// Look up the feature vector for a photo.
    ///
    /// A missing entry is `Error::MissingFeature`: skipping the photo would
    /// corrupt the batch shape guarantees, so the run must abort.
    pub fn get(&self, photo_id: &str) -> Result<&[f32]> {
        self.features
            .get(photo_id)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MissingFeature(photo_id.to_string()))
    }

    /// True when the photo has a feature vector
    pub fn contains(&self, photo_id: &str) -> bool {
        self.features.contains_key(photo_id)
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when the store is empty
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Write the store as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a store from JSON, re-checking every vector's dimension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let store: Self = serde_json::from_str(&json)?;
        for (photo_id, feature) in &store.features {
            if feature.len() != store.dim {
                return Err(Error::FeatureDim {
                    photo_id: photo_id.clone(),
                    expected: store.dim,
                    got: feature.len(),
                });
            }
        }
        Ok(store)
    }
}
