//! Batch data structure.

use ndarray::{Array2, Array3};

use crate::vocab::TokenId;

/// One training batch of paired (image feature, shifted token sequence)
/// inputs and one-hot targets.
///
/// Row `i` across all three tensors describes the same training example;
/// `photo_ids[i]` names the photo it was drawn from.
#[derive(Debug, Clone)]
pub struct CaptionBatch {
    /// Photos the examples were drawn from, in row order
    pub photo_ids: Vec<String>,
    /// Image features, `[batch, feature_dim]`
    pub features: Array2<f32>,
    /// Left-padded input token ids, `[batch, max_length]`
    pub input_ids: Array2<TokenId>,
    /// One-hot next-token targets, `[batch, max_length, vocab_size]`
    pub targets: Array3<f32>,
}

impl CaptionBatch {
    /// Number of examples in the batch
    pub fn len(&self) -> usize {
        self.photo_ids.len()
    }

    /// True when the batch holds no examples
    pub fn is_empty(&self) -> bool {
        self.photo_ids.is_empty()
    }

    /// Padded sequence length
    pub fn max_length(&self) -> usize {
        self.input_ids.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_accessors() {
        let batch = CaptionBatch {
            photo_ids: vec!["a".into(), "b".into()],
            features: Array2::zeros((2, 4)),
            input_ids: Array2::zeros((2, 6)),
            targets: Array3::zeros((2, 6, 10)),
        };

        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert_eq!(batch.max_length(), 6);
    }
}
