//! Corpus-level BLEU (Papineni et al., 2002).

use std::collections::HashMap;

/// Compute corpus-level BLEU with explicit n-gram weights.
///
/// Clipped n-gram counts and totals are pooled over the whole corpus before
/// the precision ratio is taken (never averaged per sentence), then combined
/// as a weighted geometric mean and scaled by the brevity penalty against the
/// closest reference lengths. Weight index `i` applies to `(i + 1)`-grams;
/// orders with zero weight are skipped.
///
/// `references[i]` is the list of reference token sequences for hypothesis
/// `hypotheses[i]`; pairs are zipped in order. Returns a value in `[0, 1]`,
/// and 0.0 when any weighted precision has no matches (no smoothing).
pub fn corpus_bleu(
    references: &[Vec<Vec<String>>],
    hypotheses: &[Vec<String>],
    weights: [f64; 4],
) -> f64 {
    if hypotheses.is_empty() {
        return 0.0;
    }

    let mut hyp_len = 0usize;
    let mut ref_len = 0usize;
    let mut clipped = [0usize; 4];
    let mut totals = [0usize; 4];

    for (refs, hyp) in references.iter().zip(hypotheses) {
        hyp_len += hyp.len();
        ref_len += closest_ref_len(refs, hyp.len());

        for (n, _) in weights.iter().enumerate().filter(|(_, &w)| w > 0.0) {
            let (c, t) = clipped_counts(refs, hyp, n + 1);
            clipped[n] += c;
            totals[n] += t;
        }
    }

    let mut weighted_log_sum = 0.0;
    for (n, &weight) in weights.iter().enumerate() {
        if weight == 0.0 {
            continue;
        }
        if totals[n] == 0 || clipped[n] == 0 {
            return 0.0;
        }
        let precision = clipped[n] as f64 / totals[n] as f64;
        weighted_log_sum += weight * precision.ln();
    }

    brevity_penalty(ref_len, hyp_len) * weighted_log_sum.exp()
}

/// Modified n-gram precision counts for one hypothesis: clipped matches
/// against the most generous reference, and the hypothesis n-gram total.
fn clipped_counts(references: &[Vec<String>], hypothesis: &[String], n: usize) -> (usize, usize) {
    let hyp_ngrams = extract_ngrams(hypothesis, n);
    let total: usize = hyp_ngrams.values().sum();

    let mut clipped = 0usize;
    for (ngram, &hyp_count) in &hyp_ngrams {
        let max_ref_count = references
            .iter()
            .map(|r| {
                extract_ngrams(r, n)
                    .get(ngram)
                    .copied()
                    .unwrap_or(0)
            })
            .max()
            .unwrap_or(0);
        clipped += hyp_count.min(max_ref_count);
    }

    (clipped, total)
}

/// Extract n-grams from a token sequence and count occurrences.
fn extract_ngrams<'a>(tokens: &'a [String], n: usize) -> HashMap<&'a [String], usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n && n > 0 {
        for window in tokens.windows(n) {
            *counts.entry(window).or_insert(0) += 1;
        }
    }
    counts
}

/// Reference length closest to the hypothesis length; ties favor the shorter
fn closest_ref_len(references: &[Vec<String>], hyp_len: usize) -> usize {
    references
        .iter()
        .map(Vec::len)
        .min_by_key(|&len| ((len as isize - hyp_len as isize).unsigned_abs(), len))
        .unwrap_or(0)
}

fn brevity_penalty(ref_len: usize, hyp_len: usize) -> f64 {
    if hyp_len == 0 {
        0.0
    } else if hyp_len >= ref_len {
        1.0
    } else {
        (1.0 - ref_len as f64 / hyp_len as f64).exp()
    }
}
