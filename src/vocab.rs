//! Vocabulary builder: token <-> id bijection with a frequency threshold.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::text::CaptionCorpus;
use crate::Result;

/// Token ID type
pub type TokenId = u32;

/// Reserved padding/mask id, never assigned to a real token
pub const PAD_ID: TokenId = 0;

/// Sentinel marking the start of a caption
pub const START_TOKEN: &str = "startseq";

/// Sentinel marking the end of a caption
pub const END_TOKEN: &str = "endseq";

/// A frozen token <-> id mapping built from a caption corpus.
///
/// Ids run `1..=N` over the retained tokens; id 0 is the padding sentinel.
/// Carries the corpus-derived `max_length` so the persisted artifact is
/// self-contained for validation/test/inference (the mapping is computed once
/// from the training split and reused unchanged).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    token_to_id: HashMap<String, TokenId>,
    id_to_token: HashMap<TokenId, String>,
    max_length: usize,
}

impl Vocabulary {
    /// Build a vocabulary from every caption in the corpus.
    ///
    /// Tokens occurring fewer than `min_frequency` times are dropped (not
    /// mapped to an unknown symbol). Ids are assigned in sorted token order:
    /// stable within and across builds, though callers may only rely on
    /// uniqueness and the reserved 0 id. `max_length` is the longest caption
    /// minus one, the padded sequence length after the next-token shift.
    ///
    /// Build from the *wrapped* training corpus so the start/end sentinels
    /// are counted (once per caption) and retained.
    pub fn build(corpus: &CaptionCorpus, min_frequency: usize) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for caption in corpus.all_captions() {
            for token in caption.split_whitespace() {
                *counts.entry(token).or_insert(0) += 1;
            }
        }

        let mut retained: Vec<&str> = counts
            .iter()
            .filter(|(_, &count)| count >= min_frequency)
            .map(|(&token, _)| token)
            .collect();
        retained.sort_unstable();

        let mut token_to_id = HashMap::with_capacity(retained.len());
        let mut id_to_token = HashMap::with_capacity(retained.len());
        for (i, token) in retained.into_iter().enumerate() {
            let id = (i + 1) as TokenId;
            token_to_id.insert(token.to_string(), id);
            id_to_token.insert(id, token.to_string());
        }

        Self {
            token_to_id,
            id_to_token,
            max_length: corpus.max_caption_len().saturating_sub(1),
        }
    }

    /// Number of assignable ids: retained tokens plus the padding id
    pub fn vocab_size(&self) -> usize {
        self.token_to_id.len() + 1
    }

    /// Padded sequence length derived from the training corpus
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Encode a caption, silently dropping out-of-vocabulary tokens.
    /// Never fails; a fully out-of-vocabulary caption encodes to nothing.
    pub fn encode(&self, caption: &str) -> Vec<TokenId> {
        caption
            .split_whitespace()
            .filter_map(|token| self.token_to_id.get(token).copied())
            .collect()
    }

    /// Decode ids back to a space-joined caption, skipping unknown ids
    pub fn decode(&self, ids: &[TokenId]) -> String {
        let tokens: Vec<&str> = ids.iter().filter_map(|&id| self.token(id)).collect();
        tokens.join(" ")
    }

    /// Token text for an id
    pub fn token(&self, id: TokenId) -> Option<&str> {
        self.id_to_token.get(&id).map(String::as_str)
    }

    /// Id for a token
    pub fn id(&self, token: &str) -> Option<TokenId> {
        self.token_to_id.get(token).copied()
    }

    /// Write the vocabulary as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a vocabulary from JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
