//! Caption normalization.

/// Normalize one raw caption into a canonical token stream.
///
/// Applies, per token: lowercase, strip ASCII punctuation, drop
/// single-character tokens, drop tokens still containing non-alphabetic
/// characters. Stateless and idempotent; may return an empty string when
/// nothing survives.
pub fn normalize_caption(raw: &str) -> String {
    let tokens: Vec<String> = raw
        .split_whitespace()
        .map(|t| {
            t.chars()
                .filter(|c| !c.is_ascii_punctuation())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|t| t.chars().count() > 1)
        .filter(|t| t.chars().all(char::is_alphabetic))
        .collect();

    tokens.join(" ")
}
