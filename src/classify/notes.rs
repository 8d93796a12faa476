//! "IMPORTANT NOTES" rewrite.
//!
//! Tuned for one document family where an "IMPORTANT NOTES" caption is
//! followed by two run-on sentences that were typeset as a two-item list.
//! Only applied when `important_notes_rewrite` is enabled.

use regex::Regex;
use std::sync::OnceLock;

use crate::model::{Block, BlockKind, LineToken, ListItem, ListKind, RunStyle};

use super::heading::level_for_ratio;

fn caption_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^IMPORTANT NOTES?:?$").expect("valid regex"))
}

fn sentence_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+[A-Z]").expect("valid regex"))
}

/// Whether the block text is an "IMPORTANT NOTE(S)" caption.
pub fn is_notes_caption(text: &str) -> bool {
    caption_regex().is_match(text.trim())
}

/// Promote notes captions to headings and re-split the paragraphs that
/// follow them (at the caption's indent) into a two-item list.
pub fn rewrite_important_notes(
    blocks: Vec<Block>,
    median_font_size: f64,
    indent_tolerance: f64,
) -> Vec<Block> {
    let mut out: Vec<Block> = Vec::with_capacity(blocks.len());
    let mut iter = blocks.into_iter().peekable();

    while let Some(mut block) = iter.next() {
        if !is_notes_caption(&block.text()) || block.is_list() {
            out.push(block);
            continue;
        }

        if !block.is_heading() {
            let ratio = if median_font_size > 0.0 {
                block.dominant.font_size / median_font_size
            } else {
                1.0
            };
            block.kind = BlockKind::Heading {
                level: level_for_ratio(ratio),
            };
            log::debug!("notes rewrite: promoted {:?} to heading", block.text());
        }
        let caption_indent = block.indent;
        out.push(block);

        let mut body: Vec<Block> = Vec::new();
        while let Some(next) = iter.peek() {
            let same_indent = (next.indent - caption_indent).abs() <= indent_tolerance;
            if matches!(next.kind, BlockKind::Paragraph) && same_indent {
                if let Some(next) = iter.next() {
                    body.push(next);
                }
            } else {
                break;
            }
        }

        if body.is_empty() {
            continue;
        }
        match split_into_list(&body) {
            Some(list) => out.push(list),
            None => out.extend(body),
        }
    }

    out
}

fn split_into_list(body: &[Block]) -> Option<Block> {
    let lines: Vec<String> = body.iter().flat_map(|b| b.lines.iter().cloned()).collect();
    let text = lines.join(" ");
    let text = text.trim();

    let (first, second) = match split_at_sentence(text) {
        Some(parts) => parts,
        None if lines.len() >= 2 => {
            let mid = lines.len().div_ceil(2);
            (lines[..mid].join(" "), lines[mid..].join(" "))
        }
        None => split_at_middle_word(text)?,
    };
    if first.trim().is_empty() || second.trim().is_empty() {
        return None;
    }

    let head = body.first()?;
    let style = head.dominant.clone();
    let rect = body
        .iter()
        .skip(1)
        .fold(head.rect, |acc, b| acc.union(&b.rect));

    Some(Block {
        kind: BlockKind::List {
            list_type: ListKind::Unordered,
            items: vec![item(&first, &style), item(&second, &style)],
        },
        content: Vec::new(),
        dominant: style,
        rect,
        gap_before: head.gap_before,
        indent: head.indent,
        first_line_indent: head.first_line_indent,
        line_height: head.line_height,
        lines,
    })
}

fn item(text: &str, style: &RunStyle) -> ListItem {
    ListItem::new(vec![LineToken::Text {
        text: text.trim().to_string(),
        style: style.clone(),
    }])
}

/// Split at the sentence boundary closest to the middle of the text.
fn split_at_sentence(text: &str) -> Option<(String, String)> {
    let mid = text.len() / 2;
    let cut = sentence_boundary()
        .find_iter(text)
        .map(|m| m.start() + 1)
        .min_by_key(|pos| pos.abs_diff(mid))?;
    Some((text[..cut].to_string(), text[cut..].to_string()))
}

fn split_at_middle_word(text: &str) -> Option<(String, String)> {
    let mid = text.len() / 2;
    let cut = text
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .map(|(i, _)| i)
        .min_by_key(|pos| pos.abs_diff(mid))?;
    Some((text[..cut].to_string(), text[cut..].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;

    fn paragraph(text: &str, indent: f64) -> Block {
        let style = RunStyle::default();
        Block {
            kind: BlockKind::Paragraph,
            content: vec![LineToken::Text {
                text: text.to_string(),
                style: style.clone(),
            }],
            dominant: style,
            rect: Rect::new(72.0, 600.0, 300.0, 12.0),
            gap_before: 6.0,
            indent,
            first_line_indent: indent,
            line_height: 14.4,
            lines: vec![text.to_string()],
        }
    }

    #[test]
    fn test_caption_pattern() {
        assert!(is_notes_caption("IMPORTANT NOTES"));
        assert!(is_notes_caption(" IMPORTANT NOTE: "));
        assert!(!is_notes_caption("Important notes"));
        assert!(!is_notes_caption("IMPORTANT NOTES ABOUT X"));
    }

    #[test]
    fn test_rewrite_splits_two_sentences() {
        let blocks = vec![
            paragraph("IMPORTANT NOTES", 0.0),
            paragraph("Payment is due in 30 days. Late payments incur a fee.", 0.0),
        ];
        let out = rewrite_important_notes(blocks, 12.0, 9.6);
        assert_eq!(out.len(), 2);
        assert!(out[0].is_heading());
        assert_eq!(
            out[1].list_items(),
            vec!["Payment is due in 30 days.", "Late payments incur a fee."]
        );
    }

    #[test]
    fn test_rewrite_without_boundary_splits_lines() {
        let mut body = paragraph("first line of notes", 0.0);
        body.lines = vec!["first line of notes".into(), "second line of notes".into()];
        let out = rewrite_important_notes(vec![paragraph("IMPORTANT NOTE", 0.0), body], 12.0, 9.6);
        assert_eq!(
            out[1].list_items(),
            vec!["first line of notes", "second line of notes"]
        );
    }

    #[test]
    fn test_other_blocks_untouched() {
        let blocks = vec![paragraph("Regular text.", 0.0), paragraph("More text.", 0.0)];
        assert_eq!(rewrite_important_notes(blocks.clone(), 12.0, 9.6), blocks);
    }
}
