//! Deterministic fix-ups for concatenation artifacts.
//!
//! Inserts the missing space at a lowercase→uppercase boundary when the
//! lowercase part is a known function word ("theUnited", "ofAmerica") or,
//! with a lexicon, when both sides are dictionary words ("totalAmount").
//! Mixed-case names such as "iPhone" or "McDonald" are left alone.

use super::model::LexicalModel;

/// Function words that are frequently glued to the following capitalized word.
pub const GLUED_FUNCTION_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "by", "for", "from", "in", "into", "is", "of", "on",
    "or", "the", "to", "was", "were", "with",
];

/// Apply the fix-up table to every whitespace-separated word.
pub fn apply_fixups(text: &str, model: Option<&LexicalModel>) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut word = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            out.push_str(&fix_word(&word, model));
            word.clear();
            out.push(c);
        } else {
            word.push(c);
        }
    }
    out.push_str(&fix_word(&word, model));
    out
}

fn fix_word(word: &str, model: Option<&LexicalModel>) -> String {
    let chars: Vec<char> = word.chars().collect();
    // Only a leading all-lowercase segment is considered
    let Some(boundary) = chars
        .windows(2)
        .position(|w| !(w[0].is_lowercase() && w[1].is_lowercase()))
        .map(|i| i + 1)
    else {
        return word.to_string();
    };

    let upper_starts_word = chars[boundary].is_uppercase()
        && chars.get(boundary + 1).map(|c| c.is_lowercase()).unwrap_or(false);
    if !chars[boundary - 1].is_lowercase() || !upper_starts_word {
        return word.to_string();
    }

    let head: String = chars[..boundary].iter().collect();
    let tail_word: String = chars[boundary..]
        .iter()
        .take_while(|c| c.is_alphabetic())
        .collect();

    let function_word = head.len() >= 2 && GLUED_FUNCTION_WORDS.contains(&head.as_str());
    let dictionary_pair = model
        .map(|m| head.chars().count() >= 3 && m.is_word(&head) && m.is_word(&tail_word))
        .unwrap_or(false);

    if function_word || dictionary_pair {
        let tail: String = chars[boundary..].iter().collect();
        format!("{head} {tail}")
    } else {
        word.to_string()
    }
}
