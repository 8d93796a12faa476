//! Dictionary-backed word boundary suggester.

use super::model::{normalize, LexicalModel};

/// Thresholds of the boundary suggester.
#[derive(Debug, Clone, Copy)]
pub struct SegmentConfig {
    /// Minimum confidence of an accepted split point
    pub min_confidence: f64,
    /// Minimum share of characters in complete words or valid prefixes
    pub min_coverage: f64,
    /// Minimum score gain of the split over the joined token
    pub min_score_delta: f64,
    /// Score floor of the joined token, so unknown compounds are not
    /// outscored by any split into dictionary words
    pub joined_prior: f64,
    /// Confidence multiplier of a boundary whose word pair is not a known bigram
    pub unsupported_boundary_factor: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.7,
            min_coverage: 0.4,
            min_score_delta: 0.02,
            joined_prior: 0.9,
            unsupported_boundary_factor: 0.6,
        }
    }
}

/// A proposed split point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitSuggestion {
    /// Character offset inside the letter sequence
    pub offset: usize,
    /// Confidence in `0.0..=1.0`
    pub confidence: f64,
}

/// Segment a pure-letter sequence into the most likely tokens.
///
/// Dynamic programming over split points: a dictionary word of length `n`
/// is worth `n²`, unknown characters cost 1 each.
pub fn segment<'a>(model: &LexicalModel, letters: &'a str) -> Vec<&'a str> {
    let bounds: Vec<usize> = letters
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(letters.len()))
        .collect();
    let n = bounds.len() - 1;
    if n == 0 {
        return Vec::new();
    }

    let max_len = model.max_word_len().max(1);
    let mut best = vec![f64::NEG_INFINITY; n + 1];
    let mut back = vec![0usize; n + 1];
    best[0] = 0.0;

    for end in 1..=n {
        for start in end.saturating_sub(max_len)..end {
            if best[start] == f64::NEG_INFINITY {
                continue;
            }
            let piece = &letters[bounds[start]..bounds[end]];
            let len = (end - start) as f64;
            let value = if model.is_word(piece) {
                len * len
            } else if end - start == 1 {
                -1.0
            } else {
                continue;
            };
            if best[start] + value > best[end] {
                best[end] = best[start] + value;
                back[end] = start;
            }
        }
    }

    // Walk back, gluing runs of unknown single characters together
    let mut cuts = Vec::new();
    let mut end = n;
    while end > 0 {
        let start = back[end];
        cuts.push((start, end));
        end = start;
    }
    cuts.reverse();

    let mut tokens: Vec<(usize, usize)> = Vec::new();
    for (start, end) in cuts {
        let piece = &letters[bounds[start]..bounds[end]];
        let unknown = !model.is_word(piece);
        match tokens.last_mut() {
            Some(last) if unknown && !model.is_word(&letters[bounds[last.0]..bounds[last.1]]) => {
                last.1 = end;
            }
            _ => tokens.push((start, end)),
        }
    }

    tokens
        .into_iter()
        .map(|(s, e)| &letters[bounds[s]..bounds[e]])
        .collect()
}

/// Suggest split points for a pure-letter sequence, or nothing when the
/// evidence is too weak.
///
/// A split is all or nothing: every resulting token must be a complete
/// dictionary word and every boundary must reach `min_confidence`, so the
/// tokens emitted are exactly the tokens that were scored.
pub fn suggest_splits(model: &LexicalModel, letters: &str, config: &SegmentConfig) -> Vec<SplitSuggestion> {
    if normalize(letters).chars().count() != letters.chars().count() {
        return Vec::new();
    }
    if model.is_word(letters) {
        return Vec::new();
    }

    let tokens = segment(model, letters);
    if tokens.len() < 2 || !tokens.iter().all(|t| model.is_word(t)) {
        return Vec::new();
    }

    let total: usize = tokens.iter().map(|t| t.chars().count()).sum();
    let covered: usize = tokens
        .iter()
        .filter(|t| model.is_word(t) || model.is_prefix(t))
        .map(|t| t.chars().count())
        .sum();
    if (covered as f64 / total as f64) < config.min_coverage {
        return Vec::new();
    }

    let split_score = model.sequence_score(&tokens);
    let joined_score = model.sequence_score(&[letters]).max(config.joined_prior);
    if split_score - joined_score <= config.min_score_delta {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(tokens.len() - 1);
    let mut offset = 0;
    for pair in tokens.windows(2) {
        offset += pair[0].chars().count();
        let mut confidence = model.token_score(pair[0]).min(model.token_score(pair[1]));
        if !model.is_bigram(pair[0], pair[1]) {
            confidence *= config.unsupported_boundary_factor;
        }
        if confidence < config.min_confidence {
            log::trace!("segment {:?}: weak boundary {:?}|{:?}", letters, pair[0], pair[1]);
            return Vec::new();
        }
        out.push(SplitSuggestion { offset, confidence });
    }

    log::trace!("segment {:?}: {:?}", letters, tokens);
    out
}
