//! Rendering of page layouts into markup.
//!
//! Every strategy shares the PDF → HTML coordinate contract of
//! [`crate::model::to_html`] and builds a [`dom::Element`] tree; the layout
//! adapter runs on that tree before serialization.

pub mod absolute;
pub mod adapter;
pub mod context;
pub mod dom;
pub mod flow;
mod json;
mod options;
pub mod positioned;
pub mod svg;
mod text;

pub use adapter::adapt;
pub use context::RenderContext;
pub use dom::{Element, Node};
pub use json::{layout_to_json, JsonFormat};
pub use options::{
    LayoutAdapterConfig, LayoutAdapterMode, PageSelection, RenderOptions, RenderStrategy,
    TextLayout, TextPipeline,
};
pub use text::{merge_continuations, page_text, region_text};

use crate::classify::SemanticClassifier;
use crate::layout::DocumentStats;
use crate::model::{fmt_px, PageLayout, Region};

use absolute::{page_container, region_band, render_absolute, render_region_band, Frame};
use flow::render_flow_region;
use positioned::{render_region_lines, PositionedConfig};
use svg::render_svg;

/// How non-flow regions are drawn inside a flow page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FixedRegions {
    /// Absolutely positioned runs
    Runs,
    /// Positioned line boxes
    Lines,
}

/// Renders analyzed pages with one strategy.
pub struct PageRenderer<'a> {
    options: &'a RenderOptions,
    stats: &'a DocumentStats,
    classifier: SemanticClassifier,
    positioned: PositionedConfig,
}

impl<'a> PageRenderer<'a> {
    /// Create a renderer for a document.
    pub fn new(options: &'a RenderOptions, stats: &'a DocumentStats) -> Self {
        Self {
            options,
            stats,
            classifier: SemanticClassifier::new(options.classifier_config(), stats),
            positioned: PositionedConfig::from_options(options),
        }
    }

    /// Classifier used for flow regions.
    pub fn classifier(&self) -> &SemanticClassifier {
        &self.classifier
    }

    /// Render one page layout (the layout adapter included).
    pub fn render(&self, layout: &PageLayout, ctx: &mut RenderContext) -> Element {
        let strategy = self.options.strategy();
        log::debug!("page {}: rendering with {:?}", layout.number, strategy);

        let mut page = match strategy {
            RenderStrategy::Absolute => {
                render_absolute(layout, ctx, self.options.abs_element_line_height_factor)
            }
            RenderStrategy::SvgText => {
                render_svg(layout, ctx, self.options.abs_element_line_height_factor)
            }
            RenderStrategy::Flow => self.render_flow_page(layout, ctx, FixedRegions::Runs),
            RenderStrategy::Hybrid => self.render_flow_page(layout, ctx, FixedRegions::Lines),
            RenderStrategy::SemanticPositioned => self.render_positioned_page(layout, ctx),
        };

        adapt(&mut page, &self.options.layout_adapter);
        page
    }

    fn render_positioned_page(&self, layout: &PageLayout, ctx: &mut RenderContext) -> Element {
        let frame = Frame::page(layout.height);
        let mut page = page_container(layout.number, layout.width, layout.height, "semantic")
            .with_role(dom::ROLE_ABSOLUTE);
        for region in &layout.regions {
            for line in render_region_lines(region, &frame, &self.stats.word_gaps, &self.positioned, ctx) {
                page.push(line);
            }
        }
        page
    }

    fn render_flow_page(&self, layout: &PageLayout, ctx: &mut RenderContext, fixed: FixedRegions) -> Element {
        let mut page = Element::new("div")
            .with_class("page")
            .with_class("page-flow")
            .with_attr("data-page", layout.number.to_string())
            .with_style("position", "relative")
            .with_style("width", fmt_px(layout.width));

        let mut prev_bottom = layout.height;
        for region in &layout.regions {
            let gap = (prev_bottom - region.rect.top()).max(0.0);
            prev_bottom = prev_bottom.min(region.rect.y);

            let mut el = if region.flow_allowed {
                let blocks = self.classifier.classify_region(region);
                render_flow_region(region.index, &blocks, ctx)
            } else {
                log::debug!(
                    "page {} region {}: positioned ({:?})",
                    layout.number,
                    region.index,
                    region.blockers
                );
                self.fixed_region(region, layout.height, ctx, fixed)
            };
            el.set_style("margin-top", fmt_px(gap));
            page.push(el);
        }
        page
    }

    fn fixed_region(
        &self,
        region: &Region,
        page_height: f64,
        ctx: &mut RenderContext,
        fixed: FixedRegions,
    ) -> Element {
        match fixed {
            FixedRegions::Runs => render_region_band(
                region,
                page_height,
                ctx,
                self.options.abs_element_line_height_factor,
            ),
            FixedRegions::Lines => {
                let frame = Frame::band(page_height, &region.rect);
                let mut band = region_band(region);
                for line in render_region_lines(region, &frame, &self.stats.word_gaps, &self.positioned, ctx) {
                    band.push(line);
                }
                band
            }
        }
    }
}
