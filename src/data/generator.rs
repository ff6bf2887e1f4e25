//! Infinite, restartable batch generator.

use ndarray::{Array2, Array3, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::PipelineConfig;
use crate::features::FeatureStore;
use crate::text::CaptionCorpus;
use crate::vocab::{TokenId, Vocabulary, PAD_ID};
use crate::{Error, Result};

use super::batch::CaptionBatch;

/// Lazy, infinite producer of training batches.
///
/// Each epoch visits every photo exactly once in a freshly drawn uniform
/// random permutation; each visit samples one caption uniformly (with
/// replacement across epochs) from the photo's caption list. Up to
/// `num_photos` examples accumulate per batch; the final batch of an epoch
/// may be partial, and no batch spans an epoch boundary. The stream never
/// terminates on its own — training stops pulling when it is done.
///
/// Only one batch of examples is materialized at a time. Train and
/// validation streams must be separate instances; each generator owns its
/// RNG and cursor while sharing the read-only corpus, features, and
/// vocabulary.
#[derive(Debug)]
pub struct BatchGenerator<'a> {
    corpus: &'a CaptionCorpus,
    features: &'a FeatureStore,
    vocab: &'a Vocabulary,
    num_photos: usize,
    photo_ids: Vec<&'a str>,
    order: Vec<usize>,
    cursor: usize,
    rng: StdRng,
}

impl<'a> BatchGenerator<'a> {
    /// Create a generator over a wrapped caption corpus.
    ///
    /// `seed` fixes the RNG for reproducible runs; `None` seeds from entropy.
    pub fn new(
        corpus: &'a CaptionCorpus,
        features: &'a FeatureStore,
        vocab: &'a Vocabulary,
        num_photos: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        if num_photos == 0 {
            return Err(Error::Config("num_photos must be at least 1".into()));
        }
        if corpus.is_empty() {
            return Err(Error::Config("caption corpus is empty".into()));
        }

        let photo_ids = corpus.photo_ids();
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut order: Vec<usize> = (0..photo_ids.len()).collect();
        order.shuffle(&mut rng);

        Ok(Self {
            corpus,
            features,
            vocab,
            num_photos,
            photo_ids,
            order,
            cursor: 0,
            rng,
        })
    }

    /// Create a generator from a validated pipeline configuration.
    ///
    /// Validation runs here so a hand-built config cannot smuggle a zero
    /// batch size past the constructor.
    pub fn from_config(
        corpus: &'a CaptionCorpus,
        features: &'a FeatureStore,
        vocab: &'a Vocabulary,
        config: &PipelineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Self::new(corpus, features, vocab, config.num_photos, config.seed)
    }

    /// Full training batches per epoch (the trailing partial batch excluded),
    /// the `steps_per_epoch` a training loop should pull
    pub fn steps_per_epoch(&self) -> usize {
        self.photo_ids.len() / self.num_photos
    }

    /// Photos visited per epoch
    pub fn num_photo_ids(&self) -> usize {
        self.photo_ids.len()
    }

    fn assemble(
        &self,
        photo_ids: Vec<String>,
        features: Vec<&[f32]>,
        inputs: Vec<Vec<TokenId>>,
        targets: Vec<Vec<TokenId>>,
    ) -> CaptionBatch {
        let n = photo_ids.len();
        let max_length = self.vocab.max_length();
        let vocab_size = self.vocab.vocab_size();

        let mut feature_arr = Array2::zeros((n, self.features.dim()));
        let mut input_arr = Array2::from_elem((n, max_length), PAD_ID);
        let mut target_arr = Array3::zeros((n, max_length, vocab_size));

        for i in 0..n {
            feature_arr.row_mut(i).assign(&ArrayView1::from(features[i]));
            for (t, &id) in inputs[i].iter().enumerate() {
                input_arr[[i, t]] = id;
            }
            // One-hot expansion; padding positions light index 0
            for (t, &id) in targets[i].iter().enumerate() {
                target_arr[[i, t, id as usize]] = 1.0;
            }
        }

        CaptionBatch {
            photo_ids,
            features: feature_arr,
            input_ids: input_arr,
            targets: target_arr,
        }
    }
}

impl Iterator for BatchGenerator<'_> {
    type Item = Result<CaptionBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        let max_length = self.vocab.max_length();

        let mut photo_ids = Vec::with_capacity(self.num_photos);
        let mut features = Vec::with_capacity(self.num_photos);
        let mut inputs = Vec::with_capacity(self.num_photos);
        let mut targets = Vec::with_capacity(self.num_photos);

        while photo_ids.len() < self.num_photos && self.cursor < self.order.len() {
            let photo_id = self.photo_ids[self.order[self.cursor]];
            self.cursor += 1;

            let feature = match self.features.get(photo_id) {
                Ok(f) => f,
                Err(e) => return Some(Err(e)),
            };

            // One caption per visit, drawn uniformly with replacement
            let caption = self
                .corpus
                .captions_for(photo_id)
                .and_then(|list| list.choose(&mut self.rng))
                .map(String::as_str)
                .unwrap_or("");
            let encoded = self.vocab.encode(caption);

            // Next-token shift: input drops the last id, target the first
            let split = encoded.len().saturating_sub(1);
            inputs.push(pad_left(&encoded[..split], max_length));
            targets.push(pad_left(&encoded[encoded.len().min(1)..], max_length));

            photo_ids.push(photo_id.to_string());
            features.push(feature);
        }

        // Epoch boundary: redraw the permutation before the next pull
        if self.cursor >= self.order.len() {
            self.order.shuffle(&mut self.rng);
            self.cursor = 0;
        }

        Some(Ok(self.assemble(photo_ids, features, inputs, targets)))
    }
}

/// Left-pad with the padding id to `max_length`, truncating from the front
/// when the sequence is too long.
pub(crate) fn pad_left(ids: &[TokenId], max_length: usize) -> Vec<TokenId> {
    if ids.len() >= max_length {
        ids[ids.len() - max_length..].to_vec()
    } else {
        let mut padded = vec![PAD_ID; max_length - ids.len()];
        padded.extend_from_slice(ids);
        padded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fixture(n: usize, captions_per_photo: usize) -> (CaptionCorpus, FeatureStore) {
        let words = ["black", "dog", "runs", "cat", "sits", "tall", "man"];
        let mut corpus = CaptionCorpus::new();
        let mut store = FeatureStore::new(4);
        for i in 0..n {
            let id = format!("photo{i:02}");
            for j in 0..captions_per_photo {
                let a = words[(i + j) % words.len()];
                let b = words[(i + j + 1) % words.len()];
                corpus.insert(id.clone(), format!("{a} {b}"));
            }
            store.insert(id, vec![i as f32; 4]).unwrap();
        }
        (corpus, store)
    }

    #[test]
    fn test_epoch_visits_every_photo_once() {
        let (corpus, store) = fixture(5, 2);
        let wrapped = corpus.wrapped();
        let vocab = Vocabulary::build(&wrapped, 1);
        let mut gen = BatchGenerator::new(&wrapped, &store, &vocab, 2, Some(3)).unwrap();

        let sizes: Vec<usize> = (0..3)
            .map(|_| gen.next().unwrap().unwrap().len())
            .collect();
        assert_eq!(sizes, [2, 2, 1]);
    }

    #[test]
    fn test_epoch_multiset_is_exact() {
        let (corpus, store) = fixture(7, 1);
        let wrapped = corpus.wrapped();
        let vocab = Vocabulary::build(&wrapped, 1);
        let mut gen = BatchGenerator::new(&wrapped, &store, &vocab, 3, Some(11)).unwrap();

        for _epoch in 0..3 {
            let mut seen = Vec::new();
            // 7 photos, batch 3 -> batches of [3, 3, 1]
            for _ in 0..3 {
                seen.extend(gen.next().unwrap().unwrap().photo_ids);
            }
            let unique: HashSet<&String> = seen.iter().collect();
            assert_eq!(seen.len(), 7, "no duplicates or omissions per epoch");
            assert_eq!(unique.len(), 7);
        }
    }

    #[test]
    fn test_permutation_redrawn_per_epoch() {
        let (corpus, store) = fixture(32, 1);
        let wrapped = corpus.wrapped();
        let vocab = Vocabulary::build(&wrapped, 1);
        let mut gen = BatchGenerator::new(&wrapped, &store, &vocab, 32, Some(5)).unwrap();

        let first: Vec<String> = gen.next().unwrap().unwrap().photo_ids;
        let second: Vec<String> = gen.next().unwrap().unwrap().photo_ids;

        assert_ne!(first, second, "epoch order must not be reused");
        let a: HashSet<&String> = first.iter().collect();
        let b: HashSet<&String> = second.iter().collect();
        assert_eq!(a, b, "same photo set either way");
    }

    #[test]
    fn test_shift_and_padding() {
        let mut corpus = CaptionCorpus::new();
        corpus.insert("p", "black dog runs");
        let mut store = FeatureStore::new(2);
        store.insert("p", vec![1.0, 2.0]).unwrap();

        let wrapped = corpus.wrapped();
        let vocab = Vocabulary::build(&wrapped, 1);
        let max_length = vocab.max_length(); // 5 wrapped tokens - 1 = 4
        assert_eq!(max_length, 4);

        let mut gen = BatchGenerator::new(&wrapped, &store, &vocab, 1, Some(0)).unwrap();
        let batch = gen.next().unwrap().unwrap();

        assert_eq!(batch.input_ids.ncols(), max_length);
        assert_eq!(batch.targets.shape(), [1, max_length, vocab.vocab_size()]);

        let encoded = vocab.encode("startseq black dog runs endseq");
        // input: all but last, target: all but first, both exactly max_length
        for t in 0..max_length {
            assert_eq!(batch.input_ids[[0, t]], encoded[t]);
            let target_id = encoded[t + 1] as usize;
            assert_eq!(batch.targets[[0, t, target_id]], 1.0);
            // one-hot: exactly one lit index per position
            let row_sum: f32 = (0..vocab.vocab_size())
                .map(|v| batch.targets[[0, t, v]])
                .sum();
            assert_eq!(row_sum, 1.0);
        }
    }

    #[test]
    fn test_short_caption_pads_from_left() {
        let mut corpus = CaptionCorpus::new();
        corpus.insert("long", "one two three four five");
        corpus.insert("short", "one");
        let mut store = FeatureStore::new(1);
        store.insert("long", vec![0.0]).unwrap();
        store.insert("short", vec![1.0]).unwrap();

        let wrapped = corpus.wrapped();
        let vocab = Vocabulary::build(&wrapped, 1);
        let mut gen = BatchGenerator::new(&wrapped, &store, &vocab, 2, Some(1)).unwrap();
        let batch = gen.next().unwrap().unwrap();

        let short_row = batch.photo_ids.iter().position(|id| id == "short").unwrap();
        // "startseq one endseq" -> input [s, one]: 4 leading pads at length 6
        let row: Vec<TokenId> = batch.input_ids.row(short_row).to_vec();
        assert_eq!(&row[..4], &[PAD_ID; 4]);
        assert_eq!(row[4], vocab.id("startseq").unwrap());
        assert_eq!(row[5], vocab.id("one").unwrap());
    }

    #[test]
    fn test_missing_feature_is_fatal() {
        let mut corpus = CaptionCorpus::new();
        corpus.insert("p", "black dog");
        let store = FeatureStore::new(4); // empty

        let wrapped = corpus.wrapped();
        let vocab = Vocabulary::build(&wrapped, 1);
        let mut gen = BatchGenerator::new(&wrapped, &store, &vocab, 1, Some(0)).unwrap();

        let err = gen.next().unwrap().unwrap_err();
        assert!(matches!(err, Error::MissingFeature(id) if id == "p"));
    }

    #[test]
    fn test_stream_never_terminates() {
        let (corpus, store) = fixture(3, 1);
        let wrapped = corpus.wrapped();
        let vocab = Vocabulary::build(&wrapped, 1);
        let mut gen = BatchGenerator::new(&wrapped, &store, &vocab, 2, Some(9)).unwrap();

        // Many epochs worth of pulls, always Some
        for _ in 0..50 {
            assert!(gen.next().unwrap().is_ok());
        }
    }

    #[test]
    fn test_empty_corpus_rejected() {
        let corpus = CaptionCorpus::new();
        let store = FeatureStore::new(4);
        let vocab = Vocabulary::build(&corpus, 1);

        let err = BatchGenerator::new(&corpus, &store, &vocab, 2, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let (corpus, store) = fixture(2, 1);
        let vocab = Vocabulary::build(&corpus, 1);
        let err = BatchGenerator::new(&corpus, &store, &vocab, 0, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_config_validates_first() {
        let (corpus, store) = fixture(4, 1);
        let wrapped = corpus.wrapped();
        let vocab = Vocabulary::build(&wrapped, 1);

        let config = PipelineConfig::default().with_num_photos(2).with_seed(3);
        let mut gen = BatchGenerator::from_config(&wrapped, &store, &vocab, &config).unwrap();
        assert_eq!(gen.next().unwrap().unwrap().len(), 2);

        // a config that fails validation never reaches the generator
        let bad = PipelineConfig::default().with_num_photos(0);
        let err = BatchGenerator::from_config(&wrapped, &store, &vocab, &bad).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_steps_per_epoch() {
        let (corpus, store) = fixture(10, 1);
        let vocab = Vocabulary::build(&corpus, 1);
        let gen = BatchGenerator::new(&corpus, &store, &vocab, 3, None).unwrap();
        assert_eq!(gen.steps_per_epoch(), 3);
        assert_eq!(gen.num_photo_ids(), 10);
    }

    #[test]
    fn test_pad_left() {
        assert_eq!(pad_left(&[1, 2], 4), vec![0, 0, 1, 2]);
        assert_eq!(pad_left(&[1, 2, 3, 4, 5], 3), vec![3, 4, 5]);
        assert_eq!(pad_left(&[], 2), vec![0, 0]);
    }
}
