//! Dictionary and bigram model behind the lexical enhancer.

use std::collections::HashSet;
use std::sync::OnceLock;

use unicode_normalization::UnicodeNormalization;

use super::en;

/// Score of a complete dictionary word.
const WORD_SCORE: f64 = 1.0;
/// Score of a single-letter dictionary word other than "a" and "i".
const SHORT_WORD_SCORE: f64 = 0.5;
/// Score of a valid word prefix.
const PREFIX_SCORE: f64 = 0.3;
/// Bonus per known bigram, averaged over token pairs.
const BIGRAM_BONUS: f64 = 0.05;
/// Penalty per additional token.
const SPLIT_PENALTY: f64 = 0.01;

/// Normalize text for lookups: NFKC, then lowercase.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// A locale-specific word list with prefixes and bigrams.
#[derive(Debug, Clone)]
pub struct LexicalModel {
    name: &'static str,
    words: HashSet<String>,
    prefixes: HashSet<String>,
    bigrams: HashSet<(String, String)>,
    max_word_len: usize,
}

impl LexicalModel {
    /// Build a model from whitespace-separated words and line-separated bigrams.
    pub fn from_lists(name: &'static str, words: &str, bigrams: &str) -> Self {
        let words: HashSet<String> = words.split_whitespace().map(normalize).collect();
        let mut prefixes = HashSet::new();
        for word in &words {
            let chars: Vec<char> = word.chars().collect();
            for end in 2..chars.len() {
                prefixes.insert(chars[..end].iter().collect::<String>());
            }
        }
        let bigrams = bigrams
            .lines()
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                Some((normalize(parts.next()?), normalize(parts.next()?)))
            })
            .collect();
        let max_word_len = words.iter().map(|w| w.chars().count()).max().unwrap_or(0);

        Self {
            name,
            words,
            prefixes,
            bigrams,
            max_word_len,
        }
    }

    /// Built-in English model.
    pub fn english() -> &'static LexicalModel {
        static MODEL: OnceLock<LexicalModel> = OnceLock::new();
        MODEL.get_or_init(|| LexicalModel::from_lists("en", en::WORDS, en::BIGRAMS))
    }

    /// Model for a classifier profile name (`"en"`), or `None` when the
    /// profile disables lexical correction (`"none"`) or is unknown.
    pub fn for_profile(profile: &str) -> Option<&'static LexicalModel> {
        match profile.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Some(Self::english()),
            _ => None,
        }
    }

    /// Whether a profile name is recognized (including `"none"`).
    pub fn is_known_profile(profile: &str) -> bool {
        profile.trim().eq_ignore_ascii_case("none") || Self::for_profile(profile).is_some()
    }

    /// Profile name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the (normalized) token is a dictionary word.
    pub fn is_word(&self, token: &str) -> bool {
        self.words.contains(&normalize(token))
    }

    /// Whether the (normalized) token is a proper prefix of a dictionary word.
    pub fn is_prefix(&self, token: &str) -> bool {
        self.prefixes.contains(&normalize(token))
    }

    /// Whether the pair is a known bigram.
    pub fn is_bigram(&self, first: &str, second: &str) -> bool {
        self.bigrams.contains(&(normalize(first), normalize(second)))
    }

    /// Longest dictionary word length in characters.
    pub fn max_word_len(&self) -> usize {
        self.max_word_len
    }

    /// Likelihood of a single token in `0.0..=1.0`.
    pub fn token_score(&self, token: &str) -> f64 {
        let norm = normalize(token);
        if self.words.contains(&norm) {
            if norm.chars().count() == 1 && norm != "a" && norm != "i" {
                SHORT_WORD_SCORE
            } else {
                WORD_SCORE
            }
        } else if self.prefixes.contains(&norm) {
            PREFIX_SCORE
        } else {
            0.0
        }
    }

    /// Length-weighted likelihood of a token sequence, with a bigram bonus
    /// and a small per-split penalty.
    pub fn sequence_score(&self, tokens: &[&str]) -> f64 {
        let total_len: usize = tokens.iter().map(|t| t.chars().count()).sum();
        if total_len == 0 {
            return 0.0;
        }
        let weighted: f64 = tokens
            .iter()
            .map(|t| t.chars().count() as f64 * self.token_score(t))
            .sum();
        let mut score = weighted / total_len as f64;

        if tokens.len() > 1 {
            let pairs = tokens.len() - 1;
            let known = tokens
                .windows(2)
                .filter(|w| self.is_bigram(w[0], w[1]))
                .count();
            score += BIGRAM_BONUS * known as f64 / pairs as f64;
            score -= SPLIT_PENALTY * pairs as f64;
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        let model = LexicalModel::english();
        assert!(model.is_word("Payment"));
        assert!(model.is_prefix("paym"));
        assert!(!model.is_word("paym"));
        assert!(model.is_bigram("Due", "date"));
        assert_eq!(model.name(), "en");
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize("ＴＨＥ"), "the");
        assert!(LexicalModel::english().is_word("ＴＨＥ"));
    }

    #[test]
    fn test_scores() {
        let model = LexicalModel::english();
        assert_eq!(model.token_score("invoice"), 1.0);
        assert_eq!(model.token_score("xqzv"), 0.0);
        let split = model.sequence_score(&["total", "due"]);
        let joined = model.sequence_score(&["totaldue"]);
        assert!(split > joined + 0.02);
    }

    #[test]
    fn test_profiles() {
        assert!(LexicalModel::for_profile("en").is_some());
        assert!(LexicalModel::for_profile("none").is_none());
        assert!(LexicalModel::is_known_profile("none"));
        assert!(!LexicalModel::is_known_profile("klingon"));
    }
}
