//! Semantic blocks produced by the classifier.

use serde::{Deserialize, Serialize};

use super::layout::tokens_to_text;
use super::{LineToken, Rect, RunStyle};

/// List type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    /// Bulleted list
    #[serde(rename = "ul")]
    Unordered,
    /// Numbered list
    #[serde(rename = "ol")]
    Ordered,
}

impl ListKind {
    /// HTML tag name.
    pub fn tag(&self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// One list item with its marker stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Item content
    pub content: Vec<LineToken>,
}

impl ListItem {
    /// Create an item from tokens.
    pub fn new(content: Vec<LineToken>) -> Self {
        Self { content }
    }

    /// Plain text, trimmed.
    pub fn text(&self) -> String {
        tokens_to_text(&self.content).trim().to_string()
    }
}

/// Block classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// Heading (level 1-6)
    Heading {
        /// Level
        level: u8,
    },
    /// List
    List {
        /// Ordered or unordered
        list_type: ListKind,
        /// Items in order
        items: Vec<ListItem>,
    },
    /// Body text
    Paragraph,
}

/// A classified paragraph (or run of merged paragraphs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Classification
    pub kind: BlockKind,
    /// Inline content for headings and paragraphs (empty for lists)
    pub content: Vec<LineToken>,
    /// Representative style
    pub dominant: RunStyle,
    /// Bounding box
    pub rect: Rect,
    /// Vertical gap before the block
    pub gap_before: f64,
    /// Smallest line indent
    pub indent: f64,
    /// Indent of the first line
    pub first_line_indent: f64,
    /// Baseline-to-baseline distance
    pub line_height: f64,
    /// Source line texts, used by corrective rewrites
    pub lines: Vec<String>,
}

impl Block {
    /// Whether this is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self.kind, BlockKind::Heading { .. })
    }

    /// Whether this is a list.
    pub fn is_list(&self) -> bool {
        matches!(self.kind, BlockKind::List { .. })
    }

    /// Heading level, if a heading.
    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            BlockKind::Heading { level } => Some(level),
            _ => None,
        }
    }

    /// Item texts, if a list.
    pub fn list_items(&self) -> Vec<String> {
        match &self.kind {
            BlockKind::List { items, .. } => items.iter().map(ListItem::text).collect(),
            _ => Vec::new(),
        }
    }

    /// Plain text (list items joined by newlines).
    pub fn text(&self) -> String {
        match &self.kind {
            BlockKind::List { .. } => self.list_items().join("\n"),
            _ => tokens_to_text(&self.content).trim().to_string(),
        }
    }

    /// Whether two blocks have the same classification type (heading levels
    /// and list types must match too).
    pub fn same_type(&self, other: &Block) -> bool {
        match (&self.kind, &other.kind) {
            (BlockKind::Heading { level: a }, BlockKind::Heading { level: b }) => a == b,
            (BlockKind::List { list_type: a, .. }, BlockKind::List { list_type: b, .. }) => a == b,
            (BlockKind::Paragraph, BlockKind::Paragraph) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_token(s: &str) -> LineToken {
        LineToken::Text {
            text: s.to_string(),
            style: RunStyle::default(),
        }
    }

    fn block(kind: BlockKind, content: Vec<LineToken>) -> Block {
        Block {
            kind,
            content,
            dominant: RunStyle::default(),
            rect: Rect::default(),
            gap_before: 0.0,
            indent: 0.0,
            first_line_indent: 0.0,
            line_height: 14.0,
            lines: Vec::new(),
        }
    }

    #[test]
    fn test_list_text() {
        let list = block(
            BlockKind::List {
                list_type: ListKind::Unordered,
                items: vec![
                    ListItem::new(vec![text_token("Apples")]),
                    ListItem::new(vec![text_token(" Bananas ")]),
                ],
            },
            Vec::new(),
        );
        assert_eq!(list.list_items(), vec!["Apples", "Bananas"]);
        assert_eq!(list.text(), "Apples\nBananas");
    }

    #[test]
    fn test_same_type() {
        let h1 = block(BlockKind::Heading { level: 1 }, vec![text_token("A")]);
        let h2 = block(BlockKind::Heading { level: 2 }, vec![text_token("B")]);
        let p = block(BlockKind::Paragraph, vec![text_token("C"), LineToken::Space]);

        assert!(h1.same_type(&h1.clone()));
        assert!(!h1.same_type(&h2));
        assert!(!h1.same_type(&p));
        assert_eq!(p.text(), "C");
        assert_eq!(h2.heading_level(), Some(2));
    }
}
