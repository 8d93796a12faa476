//! Page-level input types.

use super::{GlyphRun, Rect};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Thickness (px) at or below which a vector graphic counts as a rule or border.
pub const BORDER_THICKNESS: f64 = 2.0;

/// Kind of non-text page element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObstacleKind {
    /// Raster image
    Image,
    /// Vector graphic
    Vector,
    /// Interactive form widget
    FormField,
    /// Table border, rule or frame
    Border,
}

/// A non-text page element whose presence forbids safe text reflow nearby.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Bounding box in PDF space
    pub rect: Rect,
    /// Element kind
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Create a new obstacle.
    pub fn new(kind: ObstacleKind, rect: Rect) -> Self {
        Self { rect, kind }
    }

    /// Create an image obstacle.
    pub fn image(rect: Rect) -> Self {
        Self::new(ObstacleKind::Image, rect)
    }

    /// Whether this element looks like a border or rule (thin vector or explicit border).
    pub fn is_border_like(&self) -> bool {
        match self.kind {
            ObstacleKind::Border => true,
            ObstacleKind::Vector => self.rect.width.min(self.rect.height) <= BORDER_THICKNESS,
            _ => false,
        }
    }
}

/// Everything the parsing backend reports for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points
    pub width: f64,

    /// Page height in points
    pub height: f64,

    /// Glyph runs in backend order
    #[serde(default)]
    pub glyphs: Vec<GlyphRun>,

    /// Images, graphics and form fields
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

impl PageInput {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f64, height: f64) -> Self {
        Self {
            number,
            width,
            height,
            glyphs: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a glyph run.
    pub fn push_glyph(&mut self, glyph: GlyphRun) {
        self.glyphs.push(glyph);
    }

    /// Add an obstacle.
    pub fn push_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Builder-style glyph list.
    pub fn with_glyphs(mut self, glyphs: Vec<GlyphRun>) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Builder-style obstacle list.
    pub fn with_obstacles(mut self, obstacles: Vec<Obstacle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Glyphs with geometry anomalies repaired.
    pub fn sanitized_glyphs(&self) -> Vec<GlyphRun> {
        self.glyphs
            .iter()
            .filter(|g| !g.text.is_empty())
            .map(GlyphRun::sanitized)
            .collect()
    }

    /// Check that the page box can be analyzed.
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "page {} width is {}",
                self.number, self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "page {} height is {}",
                self.number, self.height
            )));
        }
        Ok(())
    }

    /// Page height usable for coordinate transforms even when the reported
    /// one is broken: falls back to the top of the highest glyph.
    pub fn effective_height(&self) -> f64 {
        if self.height.is_finite() && self.height > 0.0 {
            return self.height;
        }
        self.sanitized_glyphs()
            .iter()
            .map(|g| g.rect().top())
            .fold(0.0, f64::max)
    }

    /// Page width usable for output even when the reported one is broken.
    pub fn effective_width(&self) -> f64 {
        if self.width.is_finite() && self.width > 0.0 {
            return self.width;
        }
        self.sanitized_glyphs()
            .iter()
            .map(|g| g.rect().right())
            .fold(0.0, f64::max)
    }
}
