//! Greedy autoregressive caption decoding.

use ndarray::ArrayView1;

use crate::data::pad_left;
use crate::model::SequenceModel;
use crate::vocab::{Vocabulary, END_TOKEN, START_TOKEN};
use crate::{Error, Result};

/// Drives a [`SequenceModel`] autoregressively to caption a single image.
///
/// Greedy arg-max at every step: no beam search, no sampling temperature.
pub struct Decoder<'a, M: SequenceModel> {
    model: &'a M,
    vocab: &'a Vocabulary,
}

impl<'a, M: SequenceModel> Decoder<'a, M> {
    /// Create a decoder over a trained model and its frozen vocabulary
    pub fn new(model: &'a M, vocab: &'a Vocabulary) -> Self {
        Self { model, vocab }
    }

    /// Generate one caption from an image feature vector.
    ///
    /// Starts from the start sentinel; each step left-pads the running ids to
    /// `max_length`, queries the model, and appends the arg-max token of the
    /// last timestep. Stops on the end sentinel or once the running caption
    /// (sentinels included) reaches `max_length` tokens, whichever comes
    /// first; an id the vocabulary cannot resolve also ends decoding. The
    /// returned string has both sentinels stripped.
    ///
    /// A model stuck on one token still terminates through the length bound.
    pub fn caption(&self, feature: &[f32]) -> Result<String> {
        let max_length = self.vocab.max_length();
        let mut words: Vec<String> = vec![START_TOKEN.to_string()];

        while words.len() < max_length {
            let ids: Vec<_> = words.iter().filter_map(|w| self.vocab.id(w)).collect();
            let padded = pad_left(&ids, max_length);

            let dist = self.model.predict(feature, &padded)?;
            if dist.nrows() == 0 {
                return Err(Error::Model("model returned an empty distribution".into()));
            }
            let next_id = argmax(dist.row(dist.nrows() - 1));

            let Some(next_word) = self.vocab.token(next_id) else {
                break;
            };
            let done = next_word == END_TOKEN;
            words.push(next_word.to_string());
            if done {
                break;
            }
        }

        let stripped: Vec<&str> = words
            .iter()
            .map(String::as_str)
            .filter(|w| *w != START_TOKEN && *w != END_TOKEN)
            .collect();
        Ok(stripped.join(" "))
    }
}

/// Index of the maximum probability; ties resolve to the first index
fn argmax(row: ArrayView1<'_, f32>) -> u32 {
    let mut best = 0usize;
    let mut best_p = f32::NEG_INFINITY;
    for (i, &p) in row.iter().enumerate() {
        if p > best_p {
            best = i;
            best_p = p;
        }
    }
    best as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::CaptionCorpus;
    use crate::vocab::{TokenId, PAD_ID};
    use ndarray::Array2;

    /// Deterministic stub: the prediction depends only on how many real
    /// (non-pad) ids are present, so step k emits `script[k - 1]`.
    struct ScriptModel {
        script: Vec<TokenId>,
        max_length: usize,
        vocab_size: usize,
    }

    impl SequenceModel for ScriptModel {
        fn predict(&self, _feature: &[f32], input_ids: &[TokenId]) -> Result<Array2<f32>> {
            let step = input_ids.iter().filter(|&&id| id != PAD_ID).count();
            let next = self
                .script
                .get(step.saturating_sub(1))
                .copied()
                .unwrap_or(PAD_ID);

            let mut dist = Array2::zeros((self.max_length, self.vocab_size));
            dist[[self.max_length - 1, next as usize]] = 1.0;
            Ok(dist)
        }
    }

    fn vocab() -> Vocabulary {
        let mut corpus = CaptionCorpus::new();
        corpus.insert("a", "black dog runs over green grass field");
        corpus.insert("b", "black dog runs over green grass field");
        Vocabulary::build(&corpus.wrapped(), 1)
    }

    #[test]
    fn test_decodes_scripted_caption() {
        let vocab = vocab();
        let model = ScriptModel {
            script: vec![
                vocab.id("black").unwrap(),
                vocab.id("dog").unwrap(),
                vocab.id("runs").unwrap(),
                vocab.id(END_TOKEN).unwrap(),
            ],
            max_length: vocab.max_length(),
            vocab_size: vocab.vocab_size(),
        };

        let decoder = Decoder::new(&model, &vocab);
        assert_eq!(decoder.caption(&[0.0; 4]).unwrap(), "black dog runs");
    }

    #[test]
    fn test_immediate_end_yields_empty_caption() {
        let vocab = vocab();
        let model = ScriptModel {
            script: vec![vocab.id(END_TOKEN).unwrap()],
            max_length: vocab.max_length(),
            vocab_size: vocab.vocab_size(),
        };

        let decoder = Decoder::new(&model, &vocab);
        assert_eq!(decoder.caption(&[0.0; 4]).unwrap(), "");
    }

    #[test]
    fn test_repeating_model_terminates_by_length_bound() {
        let vocab = vocab();
        let dog = vocab.id("dog").unwrap();
        let model = ScriptModel {
            script: vec![dog; 64], // never emits endseq
            max_length: vocab.max_length(),
            vocab_size: vocab.vocab_size(),
        };

        let decoder = Decoder::new(&model, &vocab);
        let caption = decoder.caption(&[0.0; 4]).unwrap();

        let words = caption.split_whitespace().count();
        assert_eq!(words, vocab.max_length() - 1);
        assert!(caption.split_whitespace().all(|w| w == "dog"));
    }

    #[test]
    fn test_unresolvable_id_ends_decoding() {
        let vocab = vocab();
        let model = ScriptModel {
            script: vec![vocab.id("dog").unwrap(), PAD_ID],
            max_length: vocab.max_length(),
            vocab_size: vocab.vocab_size(),
        };

        let decoder = Decoder::new(&model, &vocab);
        assert_eq!(decoder.caption(&[0.0; 4]).unwrap(), "dog");
    }

    #[test]
    fn test_argmax_ties_take_first() {
        let row = ndarray::arr1(&[0.3_f32, 0.3, 0.2]);
        assert_eq!(argmax(row.view()), 0);
    }
}
