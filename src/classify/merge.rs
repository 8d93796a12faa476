//! Merging of adjacent same-type blocks.

use crate::model::{Block, BlockKind, LineToken};

/// Maximum gap between merged blocks, in median line heights.
pub const MERGE_GAP_FACTOR: f64 = 0.75;
/// Maximum indent delta between merged blocks, in median font sizes.
pub const MERGE_INDENT_FACTOR: f64 = 0.8;
/// Minimum allowed dominant font-size delta between merged paragraphs.
pub const MERGE_FONT_DELTA_MIN: f64 = 1.5;
/// Allowed dominant font-size delta between merged paragraphs, in median font sizes.
pub const MERGE_FONT_DELTA_FACTOR: f64 = 0.18;

/// Whether `next` should be merged into `prev`.
pub fn can_merge(prev: &Block, next: &Block, median_font_size: f64, median_line_height: f64) -> bool {
    if !prev.same_type(next) {
        return false;
    }
    if next.gap_before > MERGE_GAP_FACTOR * median_line_height {
        return false;
    }
    if (next.indent - prev.indent).abs() > MERGE_INDENT_FACTOR * median_font_size {
        return false;
    }
    if matches!(next.kind, BlockKind::Paragraph) {
        let max_delta = MERGE_FONT_DELTA_MIN.max(MERGE_FONT_DELTA_FACTOR * median_font_size);
        if (next.dominant.font_size - prev.dominant.font_size).abs() > max_delta {
            return false;
        }
    }
    true
}

/// Merge adjacent blocks of the same type that sit close together.
pub fn merge_blocks(blocks: Vec<Block>, median_font_size: f64, median_line_height: f64) -> Vec<Block> {
    let mut out: Vec<Block> = Vec::with_capacity(blocks.len());

    for block in blocks {
        match out.last_mut() {
            Some(prev) if can_merge(prev, &block, median_font_size, median_line_height) => {
                absorb(prev, block);
            }
            _ => out.push(block),
        }
    }

    out
}

fn absorb(prev: &mut Block, next: Block) {
    match (&mut prev.kind, next.kind) {
        (BlockKind::List { items, .. }, BlockKind::List { items: more, .. }) => {
            items.extend(more);
        }
        _ => {
            if !prev.content.is_empty() && !next.content.is_empty() {
                prev.content.push(LineToken::Space);
            }
            prev.content.extend(next.content);
        }
    }
    prev.rect = prev.rect.union(&next.rect);
    prev.indent = prev.indent.min(next.indent);
    prev.lines.extend(next.lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListItem, ListKind, Rect, RunStyle};

    fn block(kind: BlockKind, text: &str, gap_before: f64, indent: f64, size: f64) -> Block {
        let style = RunStyle {
            font_size: size,
            ..Default::default()
        };
        Block {
            kind,
            content: vec![LineToken::Text {
                text: text.to_string(),
                style: style.clone(),
            }],
            dominant: style,
            rect: Rect::new(72.0, 700.0, 200.0, 12.0),
            gap_before,
            indent,
            first_line_indent: indent,
            line_height: 14.4,
            lines: vec![text.to_string()],
        }
    }

    #[test]
    fn test_close_paragraphs_merge() {
        let blocks = vec![
            block(BlockKind::Paragraph, "First part", 0.0, 0.0, 12.0),
            block(BlockKind::Paragraph, "second part", 4.0, 2.0, 12.5),
        ];
        let merged = merge_blocks(blocks, 12.0, 14.4);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text(), "First part second part");
        assert_eq!(merged[0].lines.len(), 2);
    }

    #[test]
    fn test_distant_or_different_blocks_stay() {
        let blocks = vec![
            block(BlockKind::Paragraph, "One", 0.0, 0.0, 12.0),
            block(BlockKind::Paragraph, "Two", 20.0, 0.0, 12.0),
            block(BlockKind::Heading { level: 2 }, "Three", 2.0, 0.0, 22.0),
            block(BlockKind::Paragraph, "Four", 2.0, 30.0, 12.0),
            block(BlockKind::Paragraph, "Five", 2.0, 30.0, 16.0),
        ];
        assert_eq!(merge_blocks(blocks, 12.0, 14.4).len(), 5);
    }

    #[test]
    fn test_lists_concatenate_items() {
        let list = |item: &str| {
            let mut b = block(
                BlockKind::List {
                    list_type: ListKind::Unordered,
                    items: vec![ListItem::new(vec![LineToken::Text {
                        text: item.to_string(),
                        style: RunStyle::default(),
                    }])],
                },
                "",
                2.0,
                0.0,
                12.0,
            );
            b.content.clear();
            b
        };
        let merged = merge_blocks(vec![list("Apples"), list("Bananas")], 12.0, 14.4);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].list_items(), vec!["Apples", "Bananas"]);
    }
}
