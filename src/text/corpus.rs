//! Caption corpus: photo id -> caption list bookkeeping.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::vocab::{END_TOKEN, START_TOKEN};
use crate::{Error, Result};

use super::normalize::normalize_caption;

/// A caption dataset: photo identifier -> list of captions (one-to-many).
///
/// Backed by an ordered map so iteration order is deterministic, which keeps
/// vocabulary construction and evaluation pairing stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptionCorpus {
    captions: BTreeMap<String, Vec<String>>,
}

impl CaptionCorpus {
    /// Create an empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw annotation file.
    ///
    /// Expected line format: `<photo>.jpg#<n>[ \t]<caption text>`. Blank
    /// lines are skipped; the photo id is the filename up to its first `.`.
    pub fn parse(raw: &str) -> Self {
        let mut corpus = Self::new();
        for line in raw.lines() {
            let mut parts = line.split_whitespace();
            let Some(head) = parts.next() else { continue };
            let photo_id = head.split('.').next().unwrap_or(head).to_string();
            let caption = parts.collect::<Vec<_>>().join(" ");
            corpus.insert(photo_id, caption);
        }
        corpus
    }

    /// Add one caption for a photo
    pub fn insert(&mut self, photo_id: impl Into<String>, caption: impl Into<String>) {
        self.captions
            .entry(photo_id.into())
            .or_default()
            .push(caption.into());
    }

    /// Normalize every caption in place.
    ///
    /// The caption-to-photo association is preserved: a caption that cleans
    /// down to the empty string stays in its list rather than being filtered.
    pub fn clean(&mut self) {
        for caption_list in self.captions.values_mut() {
            for caption in caption_list.iter_mut() {
                *caption = normalize_caption(caption);
            }
        }
    }

    /// Restrict the corpus to the given split.
    ///
    /// A split id with no captions in this corpus is a configuration error.
    pub fn subset(&self, split: &[String]) -> Result<Self> {
        let mut captions = BTreeMap::new();
        for photo_id in split {
            let caption_list = self
                .captions
                .get(photo_id)
                .ok_or_else(|| Error::UnknownPhoto(photo_id.clone()))?;
            captions.insert(photo_id.clone(), caption_list.clone());
        }
        Ok(Self { captions })
    }

    /// Copy of the corpus with every caption wrapped in the start/end
    /// sentinels, the form used for training and decoding. Evaluation
    /// references stay unwrapped.
    pub fn wrapped(&self) -> Self {
        let captions = self
            .captions
            .iter()
            .map(|(photo_id, caption_list)| {
                let wrapped = caption_list
                    .iter()
                    .map(|c| {
                        if c.is_empty() {
                            format!("{START_TOKEN} {END_TOKEN}")
                        } else {
                            format!("{START_TOKEN} {c} {END_TOKEN}")
                        }
                    })
                    .collect();
                (photo_id.clone(), wrapped)
            })
            .collect();
        Self { captions }
    }

    /// Photo identifiers in deterministic (sorted) order
    pub fn photo_ids(&self) -> Vec<&str> {
        self.captions.keys().map(String::as_str).collect()
    }

    /// Captions for one photo
    pub fn captions_for(&self, photo_id: &str) -> Option<&[String]> {
        self.captions.get(photo_id).map(Vec::as_slice)
    }

    /// Iterate over (photo id, caption list) pairs in deterministic order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.captions
            .iter()
            .map(|(id, list)| (id.as_str(), list.as_slice()))
    }

    /// Iterate over every caption in the corpus
    pub fn all_captions(&self) -> impl Iterator<Item = &str> {
        self.captions
            .values()
            .flat_map(|list| list.iter().map(String::as_str))
    }

    /// Maximum caption length in tokens across the corpus
    pub fn max_caption_len(&self) -> usize {
        self.all_captions()
            .map(|c| c.split_whitespace().count())
            .max()
            .unwrap_or(0)
    }

    /// Number of photos
    pub fn len(&self) -> usize {
        self.captions.len()
    }

    /// True when the corpus holds no photos
    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    /// Total caption count across all photos
    pub fn num_captions(&self) -> usize {
        self.captions.values().map(Vec::len).sum()
    }

    /// Write the corpus as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a corpus from JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Parse a split manifest: one image filename per line, blank lines skipped.
/// Returns photo ids in file order.
pub fn parse_split(raw: &str) -> Vec<String> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let name = line.trim();
            name.split('.').next().unwrap_or(name).to_string()
        })
        .collect()
}
