//! Per-document conversion driver.
//!
//! A [`Converter`] owns validated [`RenderOptions`]. Each call to
//! [`Converter::convert`] computes the document statistics once, creates a
//! fresh [`RenderContext`] and then runs every selected page through
//! analysis, optional lexical correction and rendering. A page whose analysis
//! fails is rendered through the absolute per-run fallback; the remaining
//! pages are unaffected.
//!
//! # Example
//!
//! ```
//! use unpdf_html::convert::Converter;
//! use unpdf_html::model::{GlyphRun, PageInput};
//! use unpdf_html::render::{RenderOptions, TextLayout};
//!
//! fn main() -> unpdf_html::Result<()> {
//!     let page = PageInput::letter(1).with_glyphs(vec![
//!         GlyphRun::new("Hello", 72.0, 700.0, 30.0, 12.0, "Helvetica"),
//!         GlyphRun::new("World", 130.0, 700.0, 32.0, 12.0, "Helvetica"),
//!     ]);
//!
//!     let converter = Converter::new(RenderOptions::new().with_text_layout(TextLayout::Flow))?;
//!     let output = converter.convert(&[page])?;
//!     assert_eq!(output.pages[0].text.as_deref(), Some("Hello World"));
//!     Ok(())
//! }
//! ```

use std::borrow::Cow;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::layout::{DocumentStats, LayoutAnalyzer};
use crate::lexical::LexicalEnhancer;
use crate::model::{PageInput, PageLayout};
use crate::render::absolute::render_fallback;
use crate::render::{page_text, PageRenderer, PageSelection, RenderContext, RenderOptions};

/// Counts describing an analyzed page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummary {
    /// Number of regions
    pub regions: usize,
    /// Regions rendered as flow
    pub flow_regions: usize,
    /// Number of lines
    pub lines: usize,
    /// Number of paragraphs
    pub paragraphs: usize,
}

impl LayoutSummary {
    /// Summarize a page layout.
    pub fn of(layout: &PageLayout) -> Self {
        Self {
            regions: layout.regions.len(),
            flow_regions: layout.flow_region_count(),
            lines: layout.line_count(),
            paragraphs: layout.regions.iter().map(|r| r.paragraphs.len()).sum(),
        }
    }
}

/// Rendered output of one page.
#[derive(Debug, Clone)]
pub struct PageOutput {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page markup
    pub markup: String,
    /// Reading-order plain text (when enabled)
    pub text: Option<String>,
    /// Whether analysis failed and the absolute fallback was used
    pub fell_back: bool,
    /// Layout counts (absent for fallback pages)
    pub layout_summary: Option<LayoutSummary>,
}

/// Rendered output of a document.
#[derive(Debug, Clone, Default)]
pub struct ConversionOutput {
    /// Pages in input order
    pub pages: Vec<PageOutput>,
    /// Style classes and extra rules referenced by the markup
    pub stylesheet: String,
}

impl ConversionOutput {
    /// Wrap all pages into one standalone HTML document.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<style>\n");
        html.push_str(&self.stylesheet);
        html.push_str("</style>\n</head>\n<body>\n");
        for page in &self.pages {
            html.push_str(&page.markup);
            html.push('\n');
        }
        html.push_str("</body>\n</html>\n");
        html
    }

    /// Plain text of every page that produced any, separated by blank lines.
    pub fn text(&self) -> String {
        self.pages
            .iter()
            .filter_map(|p| p.text.as_deref())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Number of pages rendered through the fallback.
    pub fn fallback_count(&self) -> usize {
        self.pages.iter().filter(|p| p.fell_back).count()
    }
}

/// Document converter over validated options.
#[derive(Debug, Clone)]
pub struct Converter {
    options: RenderOptions,
    lexical: LexicalEnhancer,
}

impl Converter {
    /// Create a converter; fails on invalid options.
    pub fn new(options: RenderOptions) -> Result<Self> {
        options.validate()?;
        let lexical = LexicalEnhancer::for_profile(&options.text_classifier_profile);
        Ok(Self { options, lexical })
    }

    /// Options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Document-wide statistics for a set of pages.
    pub fn document_stats(&self, pages: &[PageInput]) -> DocumentStats {
        DocumentStats::from_pages(pages, self.options.line_grouping_font_size_factor)
    }

    /// Convert every selected page of a document.
    pub fn convert(&self, pages: &[PageInput]) -> Result<ConversionOutput> {
        let stats = self.document_stats(pages);
        self.convert_with_stats(pages, &stats)
    }

    /// Convert with precomputed document statistics.
    ///
    /// Statistics built for a different line grouping factor are rebuilt
    /// from `pages` first.
    pub fn convert_with_stats(&self, pages: &[PageInput], stats: &DocumentStats) -> Result<ConversionOutput> {
        let stats = self.current_stats(pages, stats);
        let stats = stats.as_ref();
        let selected = self.select(pages)?;
        let mut ctx = RenderContext::new();
        let renderer = PageRenderer::new(&self.options, stats);

        let mut output = ConversionOutput::default();
        for page in selected {
            output.pages.push(self.convert_page(page, stats, &renderer, &mut ctx));
        }
        output.stylesheet = ctx.stylesheet();

        log::debug!(
            "converted {} page(s), {} fallback(s), {} style class(es)",
            output.pages.len(),
            output.fallback_count(),
            ctx.class_count()
        );
        Ok(output)
    }

    /// Analyze one page (with lexical correction when enabled) without rendering.
    pub fn analyze(&self, page: &PageInput, stats: &DocumentStats) -> Result<PageLayout> {
        let analyzer = LayoutAnalyzer::new(stats, self.options.analyzer_config());
        let mut layout = analyzer.analyze_page(page)?;
        if self.options.lexical_enabled() {
            self.lexical.enhance_layout(&mut layout);
        }
        Ok(layout)
    }

    fn convert_page(
        &self,
        page: &PageInput,
        stats: &DocumentStats,
        renderer: &PageRenderer<'_>,
        ctx: &mut RenderContext,
    ) -> PageOutput {
        match self.analyze(page, stats) {
            Ok(layout) => {
                let markup = renderer.render(&layout, ctx).to_html();
                let text = self.options.emit_plain_text.then(|| page_text(&layout));
                PageOutput {
                    number: page.number,
                    markup,
                    text,
                    fell_back: false,
                    layout_summary: Some(LayoutSummary::of(&layout)),
                }
            }
            Err(e) => {
                log::warn!("page {}: {}, using absolute fallback", page.number, e);
                let mut fallback =
                    render_fallback(page, ctx, self.options.abs_element_line_height_factor);
                crate::render::adapt(&mut fallback, &self.options.layout_adapter);
                let text = self.options.emit_plain_text.then(|| {
                    LayoutAnalyzer::new(stats, self.options.analyzer_config())
                        .reconstruct_line_text(&page.glyphs)
                });
                PageOutput {
                    number: page.number,
                    markup: fallback.to_html(),
                    text,
                    fell_back: true,
                    layout_summary: None,
                }
            }
        }
    }

    fn current_stats<'s>(&self, pages: &[PageInput], stats: &'s DocumentStats) -> Cow<'s, DocumentStats> {
        let factor = self.options.line_grouping_font_size_factor;
        if !stats.word_gaps.is_stale(factor) {
            return Cow::Borrowed(stats);
        }
        let mut rebuilt = stats.clone();
        rebuilt.ensure_factor(pages, factor);
        Cow::Owned(rebuilt)
    }

    fn select<'p>(&self, pages: &'p [PageInput]) -> Result<Vec<&'p PageInput>> {
        let selection = &self.options.page_selection;
        if let PageSelection::Pages(wanted) = selection {
            if let Some(missing) = wanted.iter().find(|n| !pages.iter().any(|p| p.number == **n)) {
                return Err(Error::PageOutOfRange(*missing, pages.len() as u32));
            }
        }
        Ok(pages.iter().filter(|p| selection.includes(p.number)).collect())
    }
}

/// Source of pages supplied asynchronously by a parsing backend.
#[cfg(feature = "async")]
pub trait AsyncPageSource {
    /// Next page, or `None` when the document is exhausted.
    fn next_page(&mut self) -> impl std::future::Future<Output = Result<Option<PageInput>>>;
}

#[cfg(feature = "async")]
impl Converter {
    /// Await every page from `source`, then convert them.
    ///
    /// Each backend call is awaited once. Conversion yields to the scheduler
    /// between pages, so dropping the future stops at a page boundary.
    pub async fn convert_async<S: AsyncPageSource>(&self, source: &mut S) -> Result<ConversionOutput> {
        let mut pages = Vec::new();
        while let Some(page) = source.next_page().await? {
            pages.push(page);
        }

        let stats = self.document_stats(&pages);
        let selected = self.select(&pages)?;
        let mut ctx = RenderContext::new();
        let renderer = PageRenderer::new(&self.options, &stats);

        let mut output = ConversionOutput::default();
        for page in selected {
            output.pages.push(self.convert_page(page, &stats, &renderer, &mut ctx));
            tokio::task::yield_now().await;
        }
        output.stylesheet = ctx.stylesheet();
        Ok(output)
    }
}
