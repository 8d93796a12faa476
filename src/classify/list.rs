//! List marker recognition.

use regex::Regex;
use std::sync::OnceLock;

use crate::model::{LineToken, ListKind};

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^\s*(?:",
            r"(?P<bullet>[•●○◦▪▫■□‣⁃∙·]\s*|[-–—*]\s+)",
            r"|(?P<number>\d{1,3}[.)]\s+)",
            r"|(?P<roman>(?i:[ivxlcdm]{1,6})[.)]\s+)",
            r"|(?P<letter>[A-Za-z][.)]\s+)",
            r")"
        ))
        .expect("valid regex")
    })
}

/// A recognized list marker at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    /// List type implied by the marker
    pub kind: ListKind,
    /// Number of characters taken by the marker and the whitespace after it
    pub char_len: usize,
}

/// Recognize a list marker at the start of `text`.
///
/// Bullet glyphs and dashes imply an unordered list; `N.`/`N)`, `A.`/`a)` and
/// roman numerals followed by `.` or `)` imply an ordered list. A marker
/// must be followed by item text.
pub fn parse_marker(text: &str) -> Option<ListMarker> {
    let caps = marker_regex().captures(text)?;
    let whole = caps.get(0)?;
    if text[whole.end()..].trim().is_empty() {
        return None;
    }
    let kind = if caps.name("bullet").is_some() {
        ListKind::Unordered
    } else {
        ListKind::Ordered
    };
    Some(ListMarker {
        kind,
        char_len: whole.as_str().chars().count(),
    })
}

/// Whether the line text starts with a list marker.
pub fn has_marker(text: &str) -> bool {
    parse_marker(text).is_some()
}

/// Drop the first `count` characters from a token stream, then any leading
/// whitespace.
pub fn strip_leading_chars(tokens: &[LineToken], count: usize) -> Vec<LineToken> {
    let mut remaining = count;
    let mut out = Vec::with_capacity(tokens.len());

    for token in tokens {
        if remaining == 0 {
            out.push(token.clone());
            continue;
        }
        match token {
            LineToken::Space => remaining -= 1,
            LineToken::Text { text, style } => {
                let len = text.chars().count();
                if len <= remaining {
                    remaining -= len;
                } else {
                    let rest: String = text.chars().skip(remaining).collect();
                    remaining = 0;
                    out.push(LineToken::Text {
                        text: rest,
                        style: style.clone(),
                    });
                }
            }
        }
    }

    trim_leading(out)
}

fn trim_leading(tokens: Vec<LineToken>) -> Vec<LineToken> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut leading = true;
    for token in tokens {
        if !leading {
            out.push(token);
            continue;
        }
        match token {
            LineToken::Space => {}
            LineToken::Text { text, style } => {
                let trimmed = text.trim_start();
                if !trimmed.is_empty() {
                    leading = false;
                    out.push(LineToken::Text {
                        text: trimmed.to_string(),
                        style,
                    });
                }
            }
        }
    }
    out
}
