//! Merged text runs.

use serde::{Deserialize, Serialize};

use super::glyph::DESCENT_RATIO;
use super::{GlyphRun, Rect, RunStyle};

/// Fraction of `font_size × char_count` below which a reported width is
/// considered implausible.
pub const MIN_PLAUSIBLE_WIDTH_RATIO: f64 = 0.1;

/// A merged, style-uniform span of text ready for rendering.
///
/// The text is the concatenation of the constituent glyph texts plus any
/// inserted spaces; no character of a constituent is ever dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    /// Text content
    pub text: String,
    /// Left edge
    pub x: f64,
    /// Baseline
    pub y: f64,
    /// Width of the union of constituents
    pub width: f64,
    /// Height of the union of constituents
    pub height: f64,
    /// Shared style
    pub style: RunStyle,
    /// Number of glyph runs merged into this one
    pub glyph_count: usize,
}

impl TextRun {
    /// Build a single-glyph run.
    pub fn from_glyph(glyph: &GlyphRun) -> Self {
        Self {
            text: glyph.text.clone(),
            x: glyph.x,
            y: glyph.y,
            width: glyph.width.max(0.0),
            height: glyph.height,
            style: glyph.style(),
            glyph_count: 1,
        }
    }

    /// Font size.
    pub fn font_size(&self) -> f64 {
        self.style.font_size
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Bounding box.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.y - self.height * DESCENT_RATIO,
            self.width,
            self.height,
        )
    }

    /// Whether the reported width is plausible for the text
    /// (`width ≥ 0.1 × font_size × char_count`).
    pub fn has_plausible_width(&self) -> bool {
        let chars = self.char_count().max(1) as f64;
        self.width >= MIN_PLAUSIBLE_WIDTH_RATIO * self.font_size() * chars
    }

    /// Whether the text is whitespace only.
    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    /// Extend this run with another run's text and box.
    pub(crate) fn absorb(&mut self, other: &TextRun, insert_space: bool) {
        if insert_space {
            self.text.push(' ');
        }
        self.text.push_str(&other.text);

        let bottom = (self.y - self.height * DESCENT_RATIO).min(other.y - other.height * DESCENT_RATIO);
        let top = (self.y + self.height * (1.0 - DESCENT_RATIO))
            .max(other.y + other.height * (1.0 - DESCENT_RATIO));
        let right = self.right().max(other.right());
        self.x = self.x.min(other.x);
        self.width = right - self.x;
        self.height = top - bottom;
        self.y = bottom + self.height * DESCENT_RATIO;
        self.glyph_count += other.glyph_count;
    }
}

impl From<&GlyphRun> for TextRun {
    fn from(glyph: &GlyphRun) -> Self {
        TextRun::from_glyph(glyph)
    }
}
