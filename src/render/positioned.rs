//! Semantic positioned strategy: every line is a positioned box.
//!
//! In the flexbox sub-mode a line box is a flex row of fixed-width runs
//! separated by `margin-left` deltas. In the absolute sub-mode (flexbox
//! disabled, or a region forced absolute) the runs are positioned inside
//! the line box.

use crate::layout::WordGapModel;
use crate::model::{fmt_px, FlowBlocker, Line, Region};

use super::absolute::{apply_rotation, run_element, run_width, spaced_texts, Frame};
use super::context::RenderContext;
use super::dom::{Element, ROLE_LINE, ROLE_RUN};
use super::RenderOptions;

/// Smallest gap (px) that counts as a structural column gap.
pub const STRUCTURAL_GAP_MIN: f64 = 18.0;
/// Structural gap floor relative to the font size.
pub const STRUCTURAL_GAP_EM: f64 = 2.75;
/// Structural gap floor relative to the region width.
pub const STRUCTURAL_GAP_WIDTH_RATIO: f64 = 0.06;
/// Number of border-like graphics that force absolute lines.
pub const FORCE_ABSOLUTE_BORDERS: usize = 2;

/// Settings of the positioned strategy.
#[derive(Debug, Clone, Copy)]
pub struct PositionedConfig {
    /// Use flex rows
    pub flexbox: bool,
    /// Pad small inter-run gaps
    pub whitespace_padding: bool,
    /// Line box line height (× font size)
    pub line_height_factor: f64,
    /// Run line height (× font size)
    pub run_line_height_factor: f64,
    /// Overlap tolerated between consecutive flex items
    pub min_gap_px: f64,
}

impl PositionedConfig {
    /// Settings derived from render options.
    pub fn from_options(options: &RenderOptions) -> Self {
        Self {
            flexbox: options.use_flexbox_layout,
            whitespace_padding: options.whitespace_padding,
            line_height_factor: options.abs_line_height_factor,
            run_line_height_factor: options.abs_run_line_height_factor,
            min_gap_px: options.layout_adapter.min_gap_px,
        }
    }
}

/// Gap at or above which a line is structurally split (columns, form fields).
pub fn structural_gap_threshold(font_size: f64, region_width: f64) -> f64 {
    STRUCTURAL_GAP_MIN
        .max(STRUCTURAL_GAP_EM * font_size)
        .max(STRUCTURAL_GAP_WIDTH_RATIO * region_width)
}

/// Whether any line of the region has a structural gap between runs.
pub fn has_structural_gap(region: &Region) -> bool {
    region.lines.iter().any(|line| {
        let threshold = structural_gap_threshold(line.avg_font_size, region.rect.width);
        line.runs
            .windows(2)
            .any(|w| w[1].x - w[0].right() >= threshold)
    })
}

/// Whether the region must use absolutely positioned lines.
pub fn force_absolute(region: &Region) -> bool {
    region.overlaps_obstacle
        || region.border_count >= FORCE_ABSOLUTE_BORDERS
        || region.blockers.contains(&FlowBlocker::OverlappingLines)
        || has_structural_gap(region)
}

/// Line boxes of one region, positioned in `frame`.
pub fn render_region_lines(
    region: &Region,
    frame: &Frame,
    word_gaps: &WordGapModel,
    config: &PositionedConfig,
    ctx: &mut RenderContext,
) -> Vec<Element> {
    let forced = force_absolute(region);
    if forced {
        log::debug!("region {}: forced absolute lines", region.index);
    }
    region
        .lines
        .iter()
        .map(|line| {
            if config.flexbox && !forced {
                flex_line(line, frame, word_gaps, config, ctx)
            } else {
                absolute_line(line, frame, config, ctx)
            }
        })
        .collect()
}

fn line_box(line: &Line, frame: &Frame, config: &PositionedConfig) -> Element {
    let (left, top) = frame.place(&line.rect);
    Element::new("div")
        .with_role(ROLE_LINE)
        .with_class("line")
        .with_style("position", "absolute")
        .with_style("left", fmt_px(left))
        .with_style("top", fmt_px(top))
        .with_style("width", fmt_px(line.rect.width))
        .with_style("height", fmt_px(line.rect.height))
        .with_style("line-height", fmt_px(line.avg_font_size * config.line_height_factor))
}

fn absolute_line(line: &Line, frame: &Frame, config: &PositionedConfig, ctx: &mut RenderContext) -> Element {
    let mut el = line_box(line, frame, config);
    let inner = Frame::within(frame.page_height, &line.rect);
    for (run, text) in line.runs.iter().zip(spaced_texts(line)) {
        el.push(run_element(run, &text, &inner, ctx, config.run_line_height_factor));
    }
    el
}

fn flex_line(
    line: &Line,
    frame: &Frame,
    word_gaps: &WordGapModel,
    config: &PositionedConfig,
    ctx: &mut RenderContext,
) -> Element {
    let mut el = line_box(line, frame, config)
        .with_style("display", "flex")
        .with_style("align-items", "baseline")
        .with_style("white-space", "pre");

    let mut cursor = line.rect.x;
    let mut prev: Option<Element> = None;
    for (i, (run, text)) in line.runs.iter().zip(spaced_texts(line)).enumerate() {
        let width = run_width(run);
        let gap = run.x - cursor;
        let mut item = Element::new("span")
            .with_role(ROLE_RUN)
            .with_class(ctx.class_for(&run.style))
            .with_style("flex", "0 0 auto")
            .with_style("width", fmt_px(width))
            .with_style("line-height", fmt_px(run.font_size() * config.run_line_height_factor))
            .with_text(text);

        let fs = run.font_size();
        let word_break = word_gaps.stats_for(fs).space_threshold(fs);
        let boundary = line.space_before.get(i).copied().unwrap_or(false);
        if i > 0 && config.whitespace_padding && !boundary && gap > config.min_gap_px && gap < word_break {
            // Split between the trailing edge of the previous run and the leading edge of this one
            let half = gap / 2.0;
            if let Some(prev) = prev.as_mut() {
                prev.set_style("padding-right", fmt_px(half));
            }
            item.set_style("padding-left", fmt_px(half));
        } else {
            let margin = gap.max(-config.min_gap_px);
            if margin.abs() > f64::EPSILON {
                item.set_style("margin-left", fmt_px(margin));
            }
        }
        apply_rotation(&mut item, run);

        if let Some(done) = prev.replace(item) {
            el.push(done);
        }
        cursor = run.x.max(cursor) + width;
    }
    if let Some(last) = prev {
        el.push(last);
    }
    el
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GlyphRun, TextRun};

    fn run(text: &str, x: f64, width: f64) -> TextRun {
        TextRun::from_glyph(&GlyphRun::new(text, x, 700.0, width, 12.0, "Helvetica"))
    }

    fn region(lines: Vec<Line>) -> Region {
        let rect = lines
            .iter()
            .map(|l| l.rect)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        Region {
            index: 0,
            rect,
            lines,
            paragraphs: Vec::new(),
            flow_allowed: true,
            overlaps_obstacle: false,
            nearest_obstacle_distance: None,
            border_count: 0,
            blockers: Vec::new(),
        }
    }

    fn config() -> PositionedConfig {
        PositionedConfig::from_options(&RenderOptions::default())
    }

    #[test]
    fn test_structural_gap_forces_absolute() {
        let normal = region(vec![Line::new(vec![run("Hello", 72.0, 30.0), run("World", 106.0, 30.0)], vec![false, true])]);
        assert!(!force_absolute(&normal));

        let split = region(vec![Line::new(vec![run("Name", 72.0, 25.0), run("Amount", 300.0, 40.0)], vec![false, true])]);
        assert!(has_structural_gap(&split));
        assert!(force_absolute(&split));

        let mut bordered = normal.clone();
        bordered.border_count = 2;
        assert!(force_absolute(&bordered));
    }

    #[test]
    fn test_flex_line_margins() {
        let r = region(vec![Line::new(vec![run("Hello", 72.0, 30.0), run("World", 110.0, 30.0)], vec![false, true])]);
        let mut ctx = RenderContext::new();
        let lines = render_region_lines(&r, &Frame::page(792.0), &WordGapModel::default(), &config(), &mut ctx);

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.style("display"), Some("flex"));
        assert_eq!(line.px("left"), Some(72.0));
        let items: Vec<&Element> = line.child_elements().collect();
        assert_eq!(items[0].style("margin-left"), None);
        assert_eq!(items[1].px("margin-left"), Some(8.0));
        assert_eq!(line.text_content(), "Hello World");
    }

    #[test]
    fn test_small_gap_becomes_padding() {
        let r = region(vec![Line::new(vec![run("Hel", 72.0, 18.0), run("lo", 91.0, 12.0)], vec![false, false])]);
        let mut ctx = RenderContext::new();
        let lines = render_region_lines(&r, &Frame::page(792.0), &WordGapModel::default(), &config(), &mut ctx);
        let items: Vec<&Element> = lines[0].child_elements().collect();
        assert_eq!(items[0].px("padding-right"), Some(0.5));
        assert_eq!(items[1].px("padding-left"), Some(0.5));
        assert_eq!(items[1].style("margin-left"), None);
        assert_eq!(items[0].style("padding-left"), None);
        assert_eq!(items[1].style("padding-right"), None);
    }

    #[test]
    fn test_absolute_sub_mode() {
        let r = region(vec![Line::new(vec![run("A1", 72.0, 14.0), run("B2", 100.0, 14.0)], vec![false, true])]);
        let mut ctx = RenderContext::new();
        let cfg = PositionedConfig {
            flexbox: false,
            ..config()
        };
        let lines = render_region_lines(&r, &Frame::page(792.0), &WordGapModel::default(), &cfg, &mut ctx);
        let items: Vec<&Element> = lines[0].child_elements().collect();
        assert_eq!(items[1].style("position"), Some("absolute"));
        assert_eq!(items[1].px("left"), Some(28.0));
        assert_eq!(items[1].px("top"), Some(0.0));
    }
}
