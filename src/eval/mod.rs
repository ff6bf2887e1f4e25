//! Caption evaluation
//!
//! Scores generated captions against human references with corpus-level
//! BLEU (four standard n-gram weightings) and collects a small seeded sample
//! of generated captions for manual inspection.

mod bleu;

pub use bleu::corpus_bleu;

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::decode::Decoder;
use crate::features::FeatureStore;
use crate::model::SequenceModel;
use crate::text::CaptionCorpus;
use crate::vocab::Vocabulary;
use crate::Result;

/// BLEU-1 through BLEU-4 weight tuples
pub const BLEU_WEIGHTS: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.5, 0.5, 0.0, 0.0],
    [0.3, 0.3, 0.3, 0.0],
    [0.25, 0.25, 0.25, 0.25],
];

/// Seed for the inspection sample, fixed so reruns show the same photos
const SAMPLE_SEED: u64 = 1;

/// Evaluation output: the four BLEU variants plus sampled generations.
#[derive(Debug, Clone)]
pub struct EvalReport {
    /// BLEU-1 through BLEU-4, corpus-level
    pub bleu: [f64; 4],
    /// (photo id, generated caption) pairs for manual inspection
    pub samples: Vec<(String, String)>,
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "BLEU: {:.2}, {:.2}, {:.2}, {:.2}",
            self.bleu[0], self.bleu[1], self.bleu[2], self.bleu[3]
        )?;
        for (photo_id, caption) in &self.samples {
            writeln!(f, "  {photo_id}: {caption}")?;
        }
        Ok(())
    }
}

/// Scores a trained model over a held-out caption corpus.
pub struct Evaluator<'a, M: SequenceModel> {
    model: &'a M,
    vocab: &'a Vocabulary,
    num_samples: usize,
}

impl<'a, M: SequenceModel> Evaluator<'a, M> {
    /// Create an evaluator; three sampled captions by default
    pub fn new(model: &'a M, vocab: &'a Vocabulary) -> Self {
        Self {
            model,
            vocab,
            num_samples: 3,
        }
    }

    /// Set how many generated captions to sample for inspection
    pub fn with_num_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = num_samples;
        self
    }

    /// Decode a caption for every photo in the corpus and score the decoded
    /// set jointly against the references (corpus-level, not per-photo
    /// averaging).
    ///
    /// `corpus` holds the cleaned, *unwrapped* reference captions; hypothesis
    /// and reference lists stay paired by corpus order.
    pub fn evaluate(&self, corpus: &CaptionCorpus, features: &FeatureStore) -> Result<EvalReport> {
        let decoder = Decoder::new(self.model, self.vocab);

        let mut references: Vec<Vec<Vec<String>>> = Vec::with_capacity(corpus.len());
        let mut hypotheses: Vec<Vec<String>> = Vec::with_capacity(corpus.len());
        let mut generated: Vec<(String, String)> = Vec::with_capacity(corpus.len());

        for (photo_id, caption_list) in corpus.iter() {
            references.push(caption_list.iter().map(|c| tokenize(c)).collect());

            let caption = decoder.caption(features.get(photo_id)?)?;
            hypotheses.push(tokenize(&caption));
            generated.push((photo_id.to_string(), caption));
        }

        let bleu = BLEU_WEIGHTS.map(|weights| corpus_bleu(&references, &hypotheses, weights));

        let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
        let samples = generated
            .choose_multiple(&mut rng, self.num_samples)
            .cloned()
            .collect();

        Ok(EvalReport { bleu, samples })
    }
}

fn tokenize(caption: &str) -> Vec<String> {
    caption.split_whitespace().map(str::to_string).collect()
}
