//! # unpdf-html
//!
//! Layout reconstruction of PDF glyph runs into structured markup.
//!
//! A PDF parsing backend reports, per page, positioned glyph fragments and
//! the bounding boxes of images, graphics and form fields. This library
//! merges those fragments into words and runs, groups them into lines,
//! regions and paragraphs, decides where text may safely reflow, classifies
//! paragraphs into headings, lists and body text, and renders the result in
//! one of several layout modes.
//!
//! ## Quick Start
//!
//! ```
//! use unpdf_html::{GlyphRun, PageInput, RenderOptions, TextLayout};
//!
//! fn main() -> unpdf_html::Result<()> {
//!     let page = PageInput::letter(1).with_glyphs(vec![
//!         GlyphRun::new("TOTAL DUE", 72.0, 720.0, 90.0, 18.0, "Helvetica"),
//!         GlyphRun::new("Please remit payment.", 72.0, 690.0, 110.0, 12.0, "Helvetica"),
//!     ]);
//!
//!     let options = RenderOptions::new().with_text_layout(TextLayout::Flow);
//!     let html = unpdf_html::to_html(&[page], &options)?;
//!     assert!(html.contains("<p"));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Word-gap model**: per-document thresholds separating kerning from word gaps
//! - **Region analysis**: flow eligibility around images, grids and columns
//! - **Semantic classification**: headings, lists and paragraphs
//! - **Layout modes**: absolute, flow, semantic positioned (flexbox) and SVG text
//! - **Lexical repair**: conservative dictionary-based word boundary correction
//! - **Layout adapter**: absolute containers rebuilt as flex rows

pub mod classify;
pub mod convert;
pub mod error;
pub mod layout;
pub mod lexical;
pub mod model;
pub mod render;

// Re-export commonly used types
#[cfg(feature = "async")]
pub use convert::AsyncPageSource;
pub use convert::{ConversionOutput, Converter, LayoutSummary, PageOutput};
pub use error::{Error, Result};
pub use layout::{DocumentStats, LayoutAnalyzer, WordGapModel};
pub use model::{
    Block, BlockKind, FontStyle, GlyphRun, Line, Obstacle, ObstacleKind, PageInput, PageLayout,
    Paragraph, Rect, Region, TextRun,
};
pub use render::{
    JsonFormat, LayoutAdapterConfig, LayoutAdapterMode, PageSelection, RenderOptions,
    RenderStrategy, TextLayout, TextPipeline,
};

/// Convert pages into one standalone HTML document.
///
/// # Example
///
/// ```
/// use unpdf_html::{to_html, GlyphRun, PageInput, RenderOptions};
///
/// let page = PageInput::letter(1)
///     .with_glyphs(vec![GlyphRun::new("Hello", 72.0, 700.0, 30.0, 12.0, "Helvetica")]);
/// let html = to_html(&[page], &RenderOptions::default()).unwrap();
/// assert!(html.contains("Hello"));
/// ```
pub fn to_html(pages: &[PageInput], options: &RenderOptions) -> Result<String> {
    Ok(convert(pages, options)?.to_html())
}

/// Extract reading-order plain text.
///
/// # Example
///
/// ```
/// use unpdf_html::{to_text, GlyphRun, PageInput, RenderOptions};
///
/// let page = PageInput::letter(1).with_glyphs(vec![
///     GlyphRun::new("Hello", 72.0, 700.0, 30.0, 12.0, "Helvetica"),
///     GlyphRun::new("World", 130.0, 700.0, 32.0, 12.0, "Helvetica"),
/// ]);
/// assert_eq!(to_text(&[page], &RenderOptions::default()).unwrap(), "Hello World");
/// ```
pub fn to_text(pages: &[PageInput], options: &RenderOptions) -> Result<String> {
    let options = options.clone().with_plain_text(true);
    Ok(convert(pages, &options)?.text())
}

/// Convert pages with the given options.
pub fn convert(pages: &[PageInput], options: &RenderOptions) -> Result<ConversionOutput> {
    Converter::new(options.clone())?.convert(pages)
}

/// Dump the analyzed layout of one page of a document as JSON.
///
/// Statistics are computed over all `pages`; `number` selects the page.
pub fn layout_json(
    pages: &[PageInput],
    number: u32,
    options: &RenderOptions,
    format: JsonFormat,
) -> Result<String> {
    let converter = Converter::new(options.clone())?;
    let page = pages
        .iter()
        .find(|p| p.number == number)
        .ok_or(Error::PageOutOfRange(number, pages.len() as u32))?;
    let stats = converter.document_stats(pages);
    let layout = converter.analyze(page, &stats)?;
    render::layout_to_json(&layout, format)
}

/// Builder for converting a document.
///
/// # Example
///
/// ```
/// use unpdf_html::{GlyphRun, PageInput, TextLayout, UnpdfHtml};
///
/// let page = PageInput::letter(1)
///     .with_glyphs(vec![GlyphRun::new("Hello", 72.0, 700.0, 30.0, 12.0, "Helvetica")]);
/// let output = UnpdfHtml::new()
///     .with_text_layout(TextLayout::Semantic)
///     .with_flex_adapter()
///     .convert(&[page])?;
/// assert_eq!(output.pages.len(), 1);
/// # Ok::<(), unpdf_html::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnpdfHtml {
    options: RenderOptions,
}

impl UnpdfHtml {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Load options from a JSON option set.
    pub fn with_json_options(mut self, json: &str) -> Result<Self> {
        self.options = RenderOptions::from_json(json)?;
        Ok(self)
    }

    /// Set the text layout mode.
    pub fn with_text_layout(mut self, layout: TextLayout) -> Self {
        self.options = self.options.with_text_layout(layout);
        self
    }

    /// Prefer layout preservation (SVG text or positioned output).
    pub fn preserve_layout(mut self) -> Self {
        self.options = self.options.with_preserve_layout(true);
        self
    }

    /// Set the text pipeline.
    pub fn with_pipeline(mut self, pipeline: TextPipeline) -> Self {
        self.options = self.options.with_text_pipeline(pipeline);
        self
    }

    /// Enable the flexbox layout adapter with default thresholds.
    pub fn with_flex_adapter(mut self) -> Self {
        self.options = self.options.with_layout_adapter(LayoutAdapterConfig::flex());
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Convert pages.
    pub fn convert(&self, pages: &[PageInput]) -> Result<ConversionOutput> {
        convert(pages, &self.options)
    }

    /// Convert pages into one HTML document.
    pub fn to_html(&self, pages: &[PageInput]) -> Result<String> {
        to_html(pages, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageInput {
        PageInput::letter(1).with_glyphs(vec![
            GlyphRun::new("Hello", 72.0, 700.0, 30.0, 12.0, "Helvetica"),
            GlyphRun::new("World", 130.0, 700.0, 32.0, 12.0, "Helvetica"),
        ])
    }

    #[test]
    fn test_builder_options() {
        let builder = UnpdfHtml::new()
            .with_text_layout(TextLayout::Smart)
            .preserve_layout()
            .with_pipeline(TextPipeline::Smart)
            .with_flex_adapter();
        let options = builder.options();
        assert_eq!(options.strategy(), RenderStrategy::SemanticPositioned);
        assert!(options.lexical_enabled());
        assert!(options.layout_adapter.is_enabled());
    }

    #[test]
    fn test_json_options() {
        let builder = UnpdfHtml::new()
            .with_json_options(r#"{"textLayout":"flow","headingThreshold":1.4}"#)
            .unwrap();
        assert_eq!(builder.options().text_layout, TextLayout::Flow);
        assert!(UnpdfHtml::new().with_json_options("{").is_err());
    }

    #[test]
    fn test_layout_json() {
        let json = layout_json(&[page()], 1, &RenderOptions::default(), JsonFormat::Compact).unwrap();
        assert!(json.contains("\"flowAllowed\":true"));
        assert!(matches!(
            layout_json(&[page()], 4, &RenderOptions::default(), JsonFormat::Compact),
            Err(Error::PageOutOfRange(4, 1))
        ));
    }

    #[test]
    fn test_to_text() {
        let options = RenderOptions::new().with_plain_text(false);
        assert_eq!(to_text(&[page()], &options).unwrap(), "Hello World");
    }
}
