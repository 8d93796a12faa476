//! Backend input types: positioned glyph runs and their styling.

use serde::{Deserialize, Serialize};

use super::Rect;
use crate::layout::width::estimate_text_width;

/// Font size used when the backend reports an unusable one.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Largest font size accepted as-is from the backend.
pub const MAX_FONT_SIZE: f64 = 1000.0;

/// Font weight above which text counts as bold.
pub const BOLD_WEIGHT_THRESHOLD: u16 = 450;

/// Fraction of the run height that sits below the baseline.
pub const DESCENT_RATIO: f64 = 0.2;

/// Font style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright
    #[default]
    Normal,
    /// Italic
    Italic,
    /// Oblique
    Oblique,
}

impl FontStyle {
    /// CSS keyword.
    pub fn as_css(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
            FontStyle::Oblique => "oblique",
        }
    }
}

/// Text decoration reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    /// Underlined
    Underline,
    /// Struck through
    LineThrough,
    /// Overlined
    Overline,
}

impl TextDecoration {
    /// CSS keyword.
    pub fn as_css(&self) -> &'static str {
        match self {
            TextDecoration::Underline => "underline",
            TextDecoration::LineThrough => "line-through",
            TextDecoration::Overline => "overline",
        }
    }
}

/// One styled span of text as reported by the parsing backend.
///
/// Coordinates are in PDF space; `y` is the text baseline. Values are taken
/// as reported and only repaired through [`GlyphRun::sanitized`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphRun {
    /// Text content
    pub text: String,
    /// Left edge
    pub x: f64,
    /// Baseline
    pub y: f64,
    /// Advance width
    #[serde(default)]
    pub width: f64,
    /// Glyph box height
    #[serde(default)]
    pub height: f64,
    /// Font size in points
    pub font_size: f64,
    /// Font family name
    #[serde(default)]
    pub font_family: String,
    /// CSS-like font weight (400 = regular, 700 = bold)
    #[serde(default = "default_weight")]
    pub font_weight: u16,
    /// Font style
    #[serde(default)]
    pub font_style: FontStyle,
    /// Fill color (CSS color string, e.g. "#000000")
    #[serde(default = "default_color")]
    pub color: String,
    /// Rotation in degrees
    #[serde(default)]
    pub rotation: Option<f64>,
    /// Decoration
    #[serde(default)]
    pub text_decoration: Option<TextDecoration>,
}

fn default_weight() -> u16 {
    400
}

fn default_color() -> String {
    "#000000".to_string()
}

impl GlyphRun {
    /// Create a regular-weight black glyph run.
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        font_size: f64,
        font_family: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height: font_size,
            font_size,
            font_family: font_family.into(),
            font_weight: default_weight(),
            font_style: FontStyle::Normal,
            color: default_color(),
            rotation: None,
            text_decoration: None,
        }
    }

    /// Set the font weight.
    pub fn with_weight(mut self, weight: u16) -> Self {
        self.font_weight = weight;
        self
    }

    /// Set the font style.
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.font_style = style;
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the rotation in degrees.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Set the glyph box height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Style key of this run.
    pub fn style(&self) -> RunStyle {
        RunStyle {
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            font_weight: self.font_weight,
            font_style: self.font_style,
            color: self.color.clone(),
            rotation: self.rotation.unwrap_or(0.0),
            text_decoration: self.text_decoration,
        }
    }

    /// Whether the text consists only of whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    /// Repair geometry anomalies (NaN, zero or negative sizes, out-of-range
    /// font sizes) with local estimates. Never fails.
    pub fn sanitized(&self) -> GlyphRun {
        let mut g = self.clone();

        if !(g.font_size.is_finite() && g.font_size > 0.0 && g.font_size <= MAX_FONT_SIZE) {
            let fallback = if g.height.is_finite() && g.height > 0.0 && g.height <= MAX_FONT_SIZE {
                g.height
            } else {
                DEFAULT_FONT_SIZE
            };
            log::trace!(
                "glyph {:?}: font size {} replaced by {}",
                g.text,
                g.font_size,
                fallback
            );
            g.font_size = fallback;
        }

        if !(g.height.is_finite() && g.height > 0.0) {
            g.height = g.font_size;
        }

        if !(g.width.is_finite() && g.width > 0.0) {
            g.width = estimate_text_width(&g.text, g.font_size);
        }

        if !g.x.is_finite() {
            g.x = 0.0;
        }
        if !g.y.is_finite() {
            g.y = 0.0;
        }

        if let Some(r) = g.rotation {
            if !r.is_finite() {
                g.rotation = None;
            }
        }

        g
    }

    /// Bounding box (baseline minus descent up to the top of the glyph box).
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.y - self.height * DESCENT_RATIO,
            self.width.max(0.0),
            self.height,
        )
    }
}

/// Style key shared by glyph runs and merged text runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStyle {
    /// Font family
    pub font_family: String,
    /// Font size in points
    pub font_size: f64,
    /// Font weight
    pub font_weight: u16,
    /// Font style
    pub font_style: FontStyle,
    /// Color
    pub color: String,
    /// Rotation in degrees (0 when unrotated)
    pub rotation: f64,
    /// Decoration
    pub text_decoration: Option<TextDecoration>,
}

impl RunStyle {
    /// Maximum font size difference for two runs to count as one style.
    pub const SIZE_TOLERANCE: f64 = 0.5;

    /// Maximum rotation difference (degrees) for two runs to count as one style.
    pub const ROTATION_TOLERANCE: f64 = 0.01;

    /// Whether two runs share a style: same family, weight, style, color and
    /// decoration, font size within 0.5pt, rotation within 0.01°.
    pub fn matches(&self, other: &RunStyle) -> bool {
        self.font_family == other.font_family
            && (self.font_size - other.font_size).abs() <= Self::SIZE_TOLERANCE
            && self.font_weight == other.font_weight
            && self.font_style == other.font_style
            && self.color.eq_ignore_ascii_case(&other.color)
            && (self.rotation - other.rotation).abs() <= Self::ROTATION_TOLERANCE
            && self.text_decoration == other.text_decoration
    }

    /// Whether the weight counts as bold.
    pub fn is_bold(&self) -> bool {
        self.font_weight > BOLD_WEIGHT_THRESHOLD
    }

    /// Whether the style is italic or oblique.
    pub fn is_italic(&self) -> bool {
        self.font_style != FontStyle::Normal
    }

    /// Whether the run is rotated.
    pub fn is_rotated(&self) -> bool {
        self.rotation.abs() > Self::ROTATION_TOLERANCE
    }
}

impl Default for RunStyle {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: default_weight(),
            font_style: FontStyle::Normal,
            color: default_color(),
            rotation: 0.0,
            text_decoration: None,
        }
    }
}
