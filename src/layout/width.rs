//! Character-class width estimation.
//!
//! Used wherever the backend's reported width is missing or implausible.
//! Widths are expressed in em units and multiplied by the font size.

/// Width of decimal digits.
pub const DIGIT_EM: f64 = 0.52;
/// Width of uppercase letters.
pub const UPPER_EM: f64 = 0.58;
/// Width of lowercase letters.
pub const LOWER_EM: f64 = 0.55;
/// Width of punctuation and spaces.
pub const PUNCT_EM: f64 = 0.30;
/// Width of narrow glyphs (i, l, j, t, f, I, and similar).
pub const NARROW_EM: f64 = 0.25;
/// Width of wide glyphs (m, w, M, W, and ideographs).
pub const WIDE_EM: f64 = 0.75;

const NARROW: &[char] = &['i', 'l', 'j', 't', 'f', 'I', '!', '|', '\'', '.', ',', ':', ';'];
const WIDE: &[char] = &['m', 'w', 'M', 'W', '@', '%'];

/// Width class of a single character, in em.
pub fn char_em(c: char) -> f64 {
    if NARROW.contains(&c) {
        NARROW_EM
    } else if WIDE.contains(&c) || is_fullwidth(c) {
        WIDE_EM
    } else if c.is_ascii_digit() {
        DIGIT_EM
    } else if c.is_uppercase() {
        UPPER_EM
    } else if c.is_lowercase() || c.is_alphabetic() {
        LOWER_EM
    } else {
        PUNCT_EM
    }
}

/// Estimated advance width of `text` at `font_size`.
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().map(char_em).sum::<f64>() * font_size
}

/// Width to use for a run: the reported one when plausible
/// (`≥ 0.1 × font_size × char_count`), otherwise the estimate.
pub fn effective_width(text: &str, reported: f64, font_size: f64) -> f64 {
    let chars = text.chars().count().max(1) as f64;
    if reported.is_finite() && reported >= 0.1 * font_size * chars {
        reported
    } else {
        estimate_text_width(text, font_size)
    }
}

fn is_fullwidth(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3040..=0x30FF).contains(&code)
        || (0xAC00..=0xD7AF).contains(&code)
        || (0xFF01..=0xFF60).contains(&code)
}
