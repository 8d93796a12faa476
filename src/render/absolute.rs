//! Absolute strategy: every run is an independently positioned element.
//!
//! Also hosts the placement helpers shared by the other strategies and the
//! per-page fallback used when analysis fails.

use crate::layout::width::effective_width;
use crate::model::{fmt_num, fmt_px, to_html, Line, PageInput, PageLayout, Rect, Region, TextRun};

use super::context::RenderContext;
use super::dom::{Element, ROLE_ABSOLUTE, ROLE_RUN};

/// A positioning frame: the HTML-space top-left corner of a container on its page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Page height used for the coordinate transform
    pub page_height: f64,
    /// HTML x of the container's left edge
    pub left: f64,
    /// HTML y of the container's top edge
    pub top: f64,
}

impl Frame {
    /// Frame of the whole page.
    pub fn page(page_height: f64) -> Self {
        Self {
            page_height,
            left: 0.0,
            top: 0.0,
        }
    }

    /// Frame of a container covering `rect` (PDF space).
    pub fn within(page_height: f64, rect: &Rect) -> Self {
        let (left, top) = to_html(page_height, rect.x, rect.y, rect.height);
        Self {
            page_height,
            left,
            top,
        }
    }

    /// Frame of a full-width band whose top edge is the top of `rect`.
    pub fn band(page_height: f64, rect: &Rect) -> Self {
        Self {
            page_height,
            left: 0.0,
            top: page_height - rect.top(),
        }
    }

    /// Container-relative HTML position of a PDF-space box.
    pub fn place(&self, rect: &Rect) -> (f64, f64) {
        let (x, y) = to_html(self.page_height, rect.x, rect.y, rect.height);
        (x - self.left, y - self.top)
    }
}

/// Page container with absolute-positioning context.
pub fn page_container(number: u32, width: f64, height: f64, mode: &str) -> Element {
    Element::new("div")
        .with_class("page")
        .with_class(format!("page-{mode}"))
        .with_attr("data-page", number.to_string())
        .with_style("position", "relative")
        .with_style("width", fmt_px(width))
        .with_style("height", fmt_px(height))
}

/// Run width to emit: the reported one when plausible, else an estimate.
pub fn run_width(run: &TextRun) -> f64 {
    effective_width(&run.text, run.width, run.font_size())
}

/// An absolutely positioned span for one run.
pub fn run_element(
    run: &TextRun,
    text: &str,
    frame: &Frame,
    ctx: &mut RenderContext,
    line_height_factor: f64,
) -> Element {
    let rect = run.rect();
    let (left, top) = frame.place(&rect);
    let mut el = Element::new("span")
        .with_role(ROLE_RUN)
        .with_class(ctx.class_for(&run.style))
        .with_style("position", "absolute")
        .with_style("left", fmt_px(left))
        .with_style("top", fmt_px(top))
        .with_style("width", fmt_px(run_width(run)))
        .with_style("height", fmt_px(rect.height))
        .with_style("line-height", fmt_px(run.font_size() * line_height_factor))
        .with_style("white-space", "pre")
        .with_text(text);
    apply_rotation(&mut el, run);
    el
}

/// Run texts of a line, each followed by a space when a word boundary
/// separates it from the next run.
pub fn spaced_texts(line: &Line) -> Vec<String> {
    line.runs
        .iter()
        .enumerate()
        .map(|(i, run)| {
            let boundary = line.space_before.get(i + 1).copied().unwrap_or(false);
            if boundary && !run.text.ends_with(char::is_whitespace) {
                format!("{} ", run.text)
            } else {
                run.text.clone()
            }
        })
        .collect()
}

/// Rotate an element around its bottom-left corner (PDF rotation is counter-clockwise).
pub fn apply_rotation(el: &mut Element, run: &TextRun) {
    if run.style.is_rotated() {
        el.set_style("transform", format!("rotate({}deg)", fmt_num(-run.style.rotation)));
        el.set_style("transform-origin", "left bottom");
    }
}

/// Render a page with every run absolutely positioned.
pub fn render_absolute(layout: &PageLayout, ctx: &mut RenderContext, line_height_factor: f64) -> Element {
    let frame = Frame::page(layout.height);
    let mut page = page_container(layout.number, layout.width, layout.height, "absolute")
        .with_role(ROLE_ABSOLUTE);
    for region in &layout.regions {
        for line in &region.lines {
            for (run, text) in line.runs.iter().zip(spaced_texts(line)) {
                page.push(run_element(run, &text, &frame, ctx, line_height_factor));
            }
        }
    }
    page
}

/// A relatively positioned band holding a region's runs at their page x
/// offsets, for embedding a non-flow region inside block flow.
pub fn render_region_band(
    region: &Region,
    page_height: f64,
    ctx: &mut RenderContext,
    line_height_factor: f64,
) -> Element {
    let frame = Frame::band(page_height, &region.rect);
    let mut band = region_band(region);
    for line in &region.lines {
        for (run, text) in line.runs.iter().zip(spaced_texts(line)) {
            band.push(run_element(run, &text, &frame, ctx, line_height_factor));
        }
    }
    band
}

/// Empty band container sized to a region.
pub fn region_band(region: &Region) -> Element {
    Element::new("div")
        .with_class("region")
        .with_class("region-fixed")
        .with_role(ROLE_ABSOLUTE)
        .with_attr("data-region", region.index.to_string())
        .with_style("position", "relative")
        .with_style("width", fmt_px(region.rect.right()))
        .with_style("height", fmt_px(region.rect.height))
}

/// Simplest rendering straight from the page's glyphs, used when analysis fails.
pub fn render_fallback(page: &PageInput, ctx: &mut RenderContext, line_height_factor: f64) -> Element {
    let height = page.effective_height();
    let frame = Frame::page(height);
    let mut container = page_container(page.number, page.effective_width(), height, "fallback")
        .with_role(ROLE_ABSOLUTE);
    for glyph in page.sanitized_glyphs() {
        if glyph.is_whitespace() {
            continue;
        }
        let run = TextRun::from_glyph(&glyph);
        container.push(run_element(&run, &run.text, &frame, ctx, line_height_factor));
    }
    container
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GlyphRun;

    #[test]
    fn test_run_element_position() {
        let run = TextRun::from_glyph(&GlyphRun::new("Hello", 72.0, 700.0, 30.0, 10.0, "Helvetica"));
        let mut ctx = RenderContext::new();
        let el = run_element(&run, &run.text, &Frame::page(792.0), &mut ctx, 1.2);

        // Box bottom is 698 (baseline minus descent), so top = 792 - 698 - 10
        assert_eq!(el.px("left"), Some(72.0));
        assert_eq!(el.px("top"), Some(84.0));
        assert_eq!(el.px("width"), Some(30.0));
        assert_eq!(el.px("line-height"), Some(12.0));
        assert_eq!(el.text_content(), "Hello");
        assert!(el.has_role(ROLE_RUN));
    }

    #[test]
    fn test_spaced_texts() {
        let hello = TextRun::from_glyph(&GlyphRun::new("Hello", 0.0, 700.0, 30.0, 12.0, "F"));
        let world = TextRun::from_glyph(&GlyphRun::new("World", 130.0, 700.0, 30.0, 12.0, "F"));
        let line = Line::new(vec![hello, world], vec![false, true]);
        assert_eq!(spaced_texts(&line), vec!["Hello ", "World"]);
    }

    #[test]
    fn test_frame_within() {
        let frame = Frame::within(792.0, &Rect::new(50.0, 600.0, 200.0, 100.0));
        assert_eq!(frame.left, 50.0);
        assert_eq!(frame.top, 92.0);
        let (x, y) = frame.place(&Rect::new(60.0, 680.0, 10.0, 10.0));
        assert_eq!((x, y), (10.0, 10.0));
    }

    #[test]
    fn test_fallback_renders_every_glyph() {
        let mut page = PageInput::new(3, 612.0, f64::NAN);
        page.push_glyph(GlyphRun::new("A", 10.0, 100.0, 7.0, 12.0, "F"));
        page.push_glyph(GlyphRun::new(" ", 17.0, 100.0, 3.0, 12.0, "F"));
        page.push_glyph(GlyphRun::new("B", 20.0, 100.0, 7.0, 12.0, "F"));
        let mut ctx = RenderContext::new();
        let el = render_fallback(&page, &mut ctx, 1.2);
        assert_eq!(el.text_content(), "AB");
        assert_eq!(el.attr("data-page"), Some("3"));
    }
}
