//! Semantic classification of paragraphs into headings, lists and body text.
//!
//! Classification is a pure function of the paragraph text, its dominant
//! style, the document statistics and the classifier configuration.

pub mod heading;
pub mod list;
pub mod merge;
pub mod notes;

pub use heading::{detect_heading, is_all_caps, level_for_ratio};
pub use list::{has_marker, parse_marker, ListMarker};
pub use merge::merge_blocks;
pub use notes::rewrite_important_notes;

use crate::layout::DocumentStats;
use crate::model::{
    append_line_tokens, join_line_tokens, Block, BlockKind, LineToken, ListItem, ListKind, Paragraph,
    ParagraphLine, Region,
};

use list::strip_leading_chars;
use merge::MERGE_INDENT_FACTOR;

/// Classifier tuning options.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Minimum font-size ratio against the body size for headings
    pub heading_threshold: f64,
    /// Maximum heading length in characters
    pub max_heading_length: usize,
    /// Merge adjacent same-type blocks
    pub merge_same_style_lines: bool,
    /// Apply the "IMPORTANT NOTES" rewrite
    pub important_notes_rewrite: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            heading_threshold: 1.2,
            max_heading_length: 100,
            merge_same_style_lines: true,
            important_notes_rewrite: false,
        }
    }
}

/// Turns paragraphs of flow-eligible regions into typed blocks.
#[derive(Debug, Clone)]
pub struct SemanticClassifier {
    config: ClassifierConfig,
    median_font_size: f64,
    median_line_height: f64,
}

impl SemanticClassifier {
    /// Create a classifier over document statistics.
    pub fn new(config: ClassifierConfig, stats: &DocumentStats) -> Self {
        Self {
            config,
            median_font_size: stats.median_font_size,
            median_line_height: stats.median_line_height,
        }
    }

    /// Classifier configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify every paragraph of a region, then merge and rewrite blocks
    /// as configured.
    pub fn classify_region(&self, region: &Region) -> Vec<Block> {
        let blocks: Vec<Block> = region
            .paragraphs
            .iter()
            .flat_map(|p| self.classify_paragraph(p))
            .collect();
        self.finish(blocks)
    }

    /// Apply block merging and the notes rewrite to classified blocks.
    pub fn finish(&self, mut blocks: Vec<Block>) -> Vec<Block> {
        if self.config.merge_same_style_lines {
            blocks = merge_blocks(blocks, self.median_font_size, self.median_line_height);
        }
        if self.config.important_notes_rewrite {
            blocks = rewrite_important_notes(
                blocks,
                self.median_font_size,
                MERGE_INDENT_FACTOR * self.median_font_size,
            );
        }
        blocks
    }

    /// Classify one paragraph. A paragraph whose second line starts a list
    /// yields two blocks.
    pub fn classify_paragraph(&self, paragraph: &Paragraph) -> Vec<Block> {
        let lines = &paragraph.lines;
        if lines.is_empty() {
            return Vec::new();
        }

        if lines.len() == 1 {
            if let Some(level) = detect_heading(
                &paragraph.text(),
                &paragraph.dominant,
                self.median_font_size,
                self.config.heading_threshold,
                self.config.max_heading_length,
            ) {
                return vec![build_block(
                    BlockKind::Heading { level },
                    lines,
                    paragraph,
                    paragraph.gap_before,
                )];
            }
        }

        let markers: Vec<bool> = lines.iter().map(|pl| has_marker(&pl.line.text())).collect();
        let marker_count = markers.iter().filter(|m| **m).count();

        if markers[0] {
            return vec![list_block(lines, paragraph, paragraph.gap_before)];
        }
        if markers.len() >= 2 && markers[1] && marker_count >= 2 {
            let lead = build_block(BlockKind::Paragraph, &lines[..1], paragraph, paragraph.gap_before);
            let gap = (lines[0].line.rect.y - lines[1].line.rect.top()).max(0.0);
            return vec![lead, list_block(&lines[1..], paragraph, gap)];
        }

        vec![build_block(BlockKind::Paragraph, lines, paragraph, paragraph.gap_before)]
    }
}

fn build_block(kind: BlockKind, lines: &[ParagraphLine], paragraph: &Paragraph, gap_before: f64) -> Block {
    let content = match kind {
        BlockKind::List { .. } => Vec::new(),
        _ => join_line_tokens(lines),
    };
    let rect = lines
        .iter()
        .map(|pl| pl.line.rect)
        .reduce(|a, b| a.union(&b))
        .unwrap_or(paragraph.rect);
    let indent = lines
        .iter()
        .map(|pl| pl.indent)
        .reduce(f64::min)
        .unwrap_or(0.0)
        .max(0.0);

    Block {
        kind,
        content,
        dominant: paragraph.dominant.clone(),
        rect,
        gap_before,
        indent,
        first_line_indent: lines.first().map(|pl| pl.indent).unwrap_or(0.0),
        line_height: paragraph.line_height,
        lines: lines
            .iter()
            .map(|pl| pl.line.text().trim().to_string())
            .collect(),
    }
}

/// Build a list block; the first line must carry a marker. Lines without a
/// marker continue the previous item.
fn list_block(lines: &[ParagraphLine], paragraph: &Paragraph, gap_before: f64) -> Block {
    let mut list_type = None;
    let mut items: Vec<Vec<LineToken>> = Vec::new();

    for pl in lines {
        let tokens = pl.line.tokens();
        match parse_marker(&pl.line.text()) {
            Some(marker) => {
                list_type.get_or_insert(marker.kind);
                items.push(strip_leading_chars(&tokens, marker.char_len));
            }
            None => match items.last_mut() {
                Some(item) => append_line_tokens(item, tokens, pl.join_with_prev),
                None => items.push(tokens),
            },
        }
    }

    let kind = BlockKind::List {
        list_type: list_type.unwrap_or(ListKind::Unordered),
        items: items.into_iter().map(ListItem::new).collect(),
    };
    build_block(kind, lines, paragraph, gap_before)
}
