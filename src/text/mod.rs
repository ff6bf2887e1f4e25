//! Caption text handling
//!
//! Normalization of raw caption text into a canonical token stream, plus the
//! caption corpus bookkeeping: parsing the raw annotation file, restricting
//! to train/validation/test splits, and wrapping captions in the start/end
//! sentinels before encoding.

mod corpus;
mod normalize;

pub use corpus::{parse_split, CaptionCorpus};
pub use normalize::normalize_caption;
