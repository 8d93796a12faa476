//! SVG text layer: runs as `<text>` elements stretched to their exact width.

use crate::layout::width::estimate_text_width;
use crate::model::{fmt_num, PageLayout, TextRun};

use super::absolute::{page_container, run_element, spaced_texts, Frame};
use super::context::RenderContext;
use super::dom::{Element, ROLE_ABSOLUTE};

/// Minimum trimmed length of a run drawn as SVG text.
pub const SVG_MIN_CHARS: usize = 2;
/// Lowest accepted reported/estimated width ratio.
pub const SVG_MIN_WIDTH_RATIO: f64 = 0.3;
/// Highest accepted reported/estimated width ratio.
pub const SVG_MAX_WIDTH_RATIO: f64 = 3.0;
/// Largest font size drawn as SVG text.
pub const SVG_MAX_FONT_SIZE: f64 = 72.0;

/// Whether forced-width SVG text renders the run faithfully.
pub fn svg_eligible(run: &TextRun) -> bool {
    let trimmed = run.text.trim();
    if trimmed.chars().count() < SVG_MIN_CHARS || run.font_size() > SVG_MAX_FONT_SIZE {
        return false;
    }
    let estimate = estimate_text_width(&run.text, run.font_size());
    if estimate <= 0.0 {
        return false;
    }
    let ratio = run.width / estimate;
    (SVG_MIN_WIDTH_RATIO..=SVG_MAX_WIDTH_RATIO).contains(&ratio)
}

/// Render a page as an SVG text layer with HTML-positioned fallbacks.
pub fn render_svg(layout: &PageLayout, ctx: &mut RenderContext, line_height_factor: f64) -> Element {
    let frame = Frame::page(layout.height);
    let mut page = page_container(layout.number, layout.width, layout.height, "svg").with_role(ROLE_ABSOLUTE);
    let mut svg = Element::new("svg")
        .with_attr("xmlns", "http://www.w3.org/2000/svg")
        .with_attr("width", fmt_num(layout.width))
        .with_attr("height", fmt_num(layout.height))
        .with_attr(
            "viewBox",
            format!("0 0 {} {}", fmt_num(layout.width), fmt_num(layout.height)),
        )
        .with_style("position", "absolute")
        .with_style("left", "0")
        .with_style("top", "0");

    let mut fallbacks = Vec::new();
    for line in layout.regions.iter().flat_map(|r| &r.lines) {
        for (i, (run, text)) in line.runs.iter().zip(spaced_texts(line)).enumerate() {
            if svg_eligible(run) {
                if i > 0 && line.space_before.get(i).copied().unwrap_or(false) {
                    // Outside any <text>: kept for extraction, never drawn
                    svg.push_text(" ");
                }
                svg.push(text_element(run, layout.height, ctx));
            } else {
                fallbacks.push(run_element(run, &text, &frame, ctx, line_height_factor));
            }
        }
    }

    page.push(svg);
    for el in fallbacks {
        page.push(el);
    }
    page
}

fn text_element(run: &TextRun, page_height: f64, ctx: &mut RenderContext) -> Element {
    let x = run.x;
    let y = page_height - run.y;
    let mut el = Element::new("text")
        .with_class(ctx.class_for(&run.style))
        .with_attr("x", fmt_num(x))
        .with_attr("y", fmt_num(y))
        .with_attr("font-size", fmt_num(run.font_size()))
        .with_attr("fill", run.style.color.clone())
        .with_attr("textLength", fmt_num(run.width))
        .with_attr("lengthAdjust", "spacingAndGlyphs")
        .with_attr("xml:space", "preserve")
        .with_text(run.text.clone());
    if run.style.is_rotated() {
        el.set_attr(
            "transform",
            format!("rotate({} {} {})", fmt_num(-run.style.rotation), fmt_num(x), fmt_num(y)),
        );
    }
    el
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GlyphRun, Line, Region};

    fn run(text: &str, width: f64, font_size: f64) -> TextRun {
        TextRun::from_glyph(&GlyphRun::new(text, 72.0, 700.0, width, font_size, "Helvetica"))
    }

    #[test]
    fn test_eligibility() {
        assert!(svg_eligible(&run("Invoice", 45.0, 12.0)));
        assert!(!svg_eligible(&run("A", 8.0, 12.0)));
        assert!(!svg_eligible(&run("Invoice", 5.0, 12.0)));
        assert!(!svg_eligible(&run("Invoice", 400.0, 12.0)));
        assert!(!svg_eligible(&run("Big", 300.0, 96.0)));
    }

    #[test]
    fn test_render_svg_split() {
        let line = Line::new(vec![run("Invoice", 45.0, 12.0)], vec![false]);
        let lone = Line::new(vec![run("#", 7.0, 12.0)], vec![false]);
        let region = Region {
            index: 0,
            rect: line.rect,
            lines: vec![line, lone],
            paragraphs: Vec::new(),
            flow_allowed: true,
            overlaps_obstacle: false,
            nearest_obstacle_distance: None,
            border_count: 0,
            blockers: Vec::new(),
        };
        let layout = PageLayout {
            number: 1,
            width: 612.0,
            height: 792.0,
            regions: vec![region],
            obstacles: Vec::new(),
        };

        let mut ctx = RenderContext::new();
        let page = render_svg(&layout, &mut ctx, 1.2);
        let children: Vec<&Element> = page.child_elements().collect();
        assert_eq!(children[0].tag, "svg");
        let text = children[0].child_elements().next().unwrap();
        assert_eq!(text.attr("y"), Some("92"));
        assert_eq!(text.attr("textLength"), Some("45"));
        assert_eq!(children[1].text_content(), "#");
    }
}
