//! Heading detection.

use crate::model::RunStyle;

/// Heading level for a font-size ratio against the body size.
pub fn level_for_ratio(ratio: f64) -> u8 {
    if ratio >= 2.0 {
        1
    } else if ratio >= 1.8 {
        2
    } else if ratio >= 1.5 {
        3
    } else if ratio >= 1.3 {
        4
    } else if ratio >= 1.2 {
        5
    } else {
        6
    }
}

/// Whether the text is entirely uppercase and has at least one letter.
pub fn is_all_caps(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| !c.is_lowercase())
}

/// Heading level of a single line, or `None` for body text.
///
/// Requires a trimmed length of at most `max_length` characters, a font size
/// of at least `threshold × median_font_size`, and either bold weight or
/// all-caps text.
pub fn detect_heading(
    text: &str,
    style: &RunStyle,
    median_font_size: f64,
    threshold: f64,
    max_length: usize,
) -> Option<u8> {
    let text = text.trim();
    if text.is_empty() || text.chars().count() > max_length {
        return None;
    }
    if !median_font_size.is_finite() || median_font_size <= 0.0 {
        return None;
    }

    let ratio = style.font_size / median_font_size;
    if ratio < threshold {
        return None;
    }
    if !(style.is_bold() || is_all_caps(text)) {
        return None;
    }

    Some(level_for_ratio(ratio))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(size: f64, weight: u16) -> RunStyle {
        RunStyle {
            font_size: size,
            font_weight: weight,
            ..Default::default()
        }
    }

    #[test]
    fn test_levels() {
        assert_eq!(level_for_ratio(2.5), 1);
        assert_eq!(level_for_ratio(1.8), 2);
        assert_eq!(level_for_ratio(1.5), 3);
        assert_eq!(level_for_ratio(1.3), 4);
        assert_eq!(level_for_ratio(1.2), 5);
        assert_eq!(level_for_ratio(1.1), 6);
    }

    #[test]
    fn test_all_caps_heading() {
        assert_eq!(detect_heading("TOTAL DUE", &style(18.0, 400), 12.0, 1.2, 100), Some(3));
    }

    #[test]
    fn test_bold_heading() {
        assert_eq!(detect_heading("Introduction", &style(24.0, 700), 12.0, 1.2, 100), Some(1));
        assert_eq!(detect_heading("Introduction", &style(24.0, 400), 12.0, 1.2, 100), None);
    }

    #[test]
    fn test_rejections() {
        assert_eq!(detect_heading("SMALL", &style(12.0, 700), 12.0, 1.2, 100), None);
        let long = "A".repeat(101);
        assert_eq!(detect_heading(&long, &style(24.0, 700), 12.0, 1.2, 100), None);
        assert_eq!(detect_heading("1234", &style(24.0, 400), 12.0, 1.2, 100), None);
    }

    #[test]
    fn test_all_caps() {
        assert!(is_all_caps("NOTE 1:"));
        assert!(!is_all_caps("Note"));
        assert!(!is_all_caps("42"));
    }
}
