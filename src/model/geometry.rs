//! Geometry primitives and the PDF → HTML coordinate contract.
//!
//! All geometry in the model is expressed in PDF user space: origin at the
//! bottom-left of the page, `y` growing upwards. Renderers convert to a
//! top-left origin through [`to_html`] and round with [`round3`] at emission.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in PDF space (`y` is the bottom edge).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Bottom edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its edges.
    pub fn from_edges(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            x: left,
            y: bottom,
            width: (right - left).max(0.0),
            height: (top - bottom).max(0.0),
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Whether every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.top().max(other.top()),
        )
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Rect {
        Rect::from_edges(
            self.x - margin,
            self.y - margin,
            self.right() + margin,
            self.top() + margin,
        )
    }

    /// Whether the two rectangles share any area (touching edges do not count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }

    /// Length of the overlap of the two horizontal extents (0 if disjoint).
    pub fn horizontal_overlap(&self, other: &Rect) -> f64 {
        (self.right().min(other.right()) - self.x.max(other.x)).max(0.0)
    }

    /// Length of the overlap of the two vertical extents (0 if disjoint).
    pub fn vertical_overlap(&self, other: &Rect) -> f64 {
        (self.top().min(other.top()) - self.y.max(other.y)).max(0.0)
    }

    /// Euclidean distance between the closest points of two rectangles.
    pub fn distance_to(&self, other: &Rect) -> f64 {
        let dx = (other.x - self.right()).max(self.x - other.right()).max(0.0);
        let dy = (other.y - self.top()).max(self.y - other.top()).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Convert a PDF-space box (bottom-left origin) to an HTML top-left origin.
///
/// `htmlX = pdfX`, `htmlY = pageHeight - pdfY - elementHeight`, where `pdf_y`
/// is the bottom edge of the element. No rounding is applied here.
pub fn to_html(page_height: f64, pdf_x: f64, pdf_y: f64, element_height: f64) -> (f64, f64) {
    (pdf_x, page_height - pdf_y - element_height)
}

/// Inverse of [`to_html`] for the vertical axis.
pub fn from_html_y(page_height: f64, html_y: f64, element_height: f64) -> f64 {
    page_height - html_y - element_height
}

/// Round to 3 decimal places for deterministic emission.
pub fn round3(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid emitting "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Format a length for CSS/SVG emission (`round3`, no unit).
pub fn fmt_num(value: f64) -> String {
    format!("{}", round3(value))
}

/// Format a pixel length for CSS emission.
pub fn fmt_px(value: f64) -> String {
    format!("{}px", round3(value))
}

/// Median of a slice of values (NaN values are ignored). Returns `None` for empty input.
pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 0.5)
}

/// Linear-interpolated percentile (`q` in `0.0..=1.0`). Returns `None` for empty input.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}
