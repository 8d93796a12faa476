//! JSON dumps of page layouts for debugging.

use crate::error::{Error, Result};
use crate::model::PageLayout;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a page layout (regions, lines, paragraphs, flow decisions).
pub fn layout_to_json(layout: &PageLayout, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(layout),
        JsonFormat::Compact => serde_json::to_string(layout),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
