//! Rendering options and configuration.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::classify::ClassifierConfig;
use crate::error::{Error, Result};
use crate::layout::{AnalyzerConfig, SpaceRule};
use crate::lexical::LexicalModel;

/// How page text is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextLayout {
    /// Every run absolutely positioned (or SVG text with `preserve_layout`)
    #[default]
    Absolute,
    /// Reflowable headings, paragraphs and lists
    Flow,
    /// Lines as positioned flex rows
    Semantic,
    /// Flow where safe, positioned elsewhere
    Smart,
}

/// Text reconstruction pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPipeline {
    /// Gap-ratio word boundaries, no lexical correction
    Legacy,
    /// Word-gap model
    #[default]
    V2,
    /// Word-gap model plus lexical correction
    Smart,
}

/// Rendering strategy resolved from `text_layout` × `preserve_layout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Independently positioned runs
    Absolute,
    /// SVG text layer with forced run widths
    SvgText,
    /// Block flow (non-flow regions stay positioned)
    Flow,
    /// Positioned lines everywhere
    SemanticPositioned,
    /// Flow for flow-eligible regions, positioned lines elsewhere
    Hybrid,
}

/// Layout adapter mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutAdapterMode {
    /// Leave absolute markup untouched
    #[default]
    None,
    /// Rebuild absolute containers as flex rows
    Flex,
}

/// Settings of the absolute-to-flex layout adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutAdapterConfig {
    /// Adapter mode
    pub mode: LayoutAdapterMode,
    /// Maximum vertical offset (px) between items of one row
    pub row_threshold_px: f64,
    /// Smallest gap (px) that becomes a spacer
    pub min_gap_px: f64,
    /// Turn gaps between rows into spacers
    pub preserve_vertical_gaps: bool,
}

impl Default for LayoutAdapterConfig {
    fn default() -> Self {
        Self {
            mode: LayoutAdapterMode::None,
            row_threshold_px: 8.0,
            min_gap_px: 0.5,
            preserve_vertical_gaps: true,
        }
    }
}

impl LayoutAdapterConfig {
    /// Flex adapter with default thresholds.
    pub fn flex() -> Self {
        Self {
            mode: LayoutAdapterMode::Flex,
            ..Self::default()
        }
    }

    /// Whether the adapter runs.
    pub fn is_enabled(&self) -> bool {
        self.mode == LayoutAdapterMode::Flex
    }
}

/// Options for reconstructing and rendering pages.
///
/// Deserializes from a camelCase JSON option set; missing fields take their
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Layout strategy family
    pub text_layout: TextLayout,
    /// Prefer visual fidelity over reflow within the chosen family
    pub preserve_layout: bool,
    /// Text reconstruction pipeline
    pub text_pipeline: TextPipeline,
    /// Merge passes (2 enables the aggressive pass)
    pub text_layout_passes: u8,
    /// Minimum font-size ratio for headings
    pub heading_threshold: f64,
    /// Maximum heading length in characters
    pub max_heading_length: usize,
    /// Paragraph gap factor (× median line height)
    pub block_gap_factor: f64,
    /// Merge adjacent same-type blocks
    pub merge_same_style_lines: bool,
    /// Pad small inter-run gaps in positioned rows
    pub whitespace_padding: bool,
    /// Use flex rows in the semantic positioned strategy
    pub use_flexbox_layout: bool,
    /// Baseline tolerance factor (× font size)
    pub line_grouping_font_size_factor: f64,
    /// Line height of absolutely positioned elements (× font size)
    pub abs_element_line_height_factor: f64,
    /// Line height of runs inside positioned lines (× font size)
    pub abs_run_line_height_factor: f64,
    /// Line height of positioned line boxes (× font size)
    pub abs_line_height_factor: f64,
    /// Layout adapter settings
    pub layout_adapter: LayoutAdapterConfig,
    /// Lexical model profile (`"en"`, `"none"`)
    pub text_classifier_profile: String,
    /// Region separation gap factor (× median line height)
    pub region_gap_factor: f64,
    /// Distance (px) within which an obstacle blocks flow
    pub obstacle_margin: f64,
    /// Paragraph indent delta factor (× font size)
    pub paragraph_indent_factor: f64,
    /// Apply the "IMPORTANT NOTES" list rewrite
    pub important_notes_rewrite: bool,
    /// Produce reading-order plain text per page
    pub emit_plain_text: bool,
    /// Pages to convert
    #[serde(skip)]
    pub page_selection: PageSelection,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            text_layout: TextLayout::Absolute,
            preserve_layout: false,
            text_pipeline: TextPipeline::V2,
            text_layout_passes: 1,
            heading_threshold: 1.2,
            max_heading_length: 100,
            block_gap_factor: 1.8,
            merge_same_style_lines: true,
            whitespace_padding: true,
            use_flexbox_layout: true,
            line_grouping_font_size_factor: 0.35,
            abs_element_line_height_factor: 1.2,
            abs_run_line_height_factor: 1.0,
            abs_line_height_factor: 1.15,
            layout_adapter: LayoutAdapterConfig::default(),
            text_classifier_profile: "en".to_string(),
            region_gap_factor: 2.5,
            obstacle_margin: 4.0,
            paragraph_indent_factor: 1.0,
            important_notes_rewrite: false,
            emit_plain_text: true,
            page_selection: PageSelection::All,
        }
    }
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON object; unknown layouts fail, missing fields default.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: RenderOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Set the layout strategy family.
    pub fn with_text_layout(mut self, layout: TextLayout) -> Self {
        self.text_layout = layout;
        self
    }

    /// Prefer visual fidelity (SVG text in absolute mode, positioned lines in smart mode).
    pub fn with_preserve_layout(mut self, preserve: bool) -> Self {
        self.preserve_layout = preserve;
        self
    }

    /// Set the text pipeline.
    pub fn with_text_pipeline(mut self, pipeline: TextPipeline) -> Self {
        self.text_pipeline = pipeline;
        self
    }

    /// Set the number of merge passes.
    pub fn with_layout_passes(mut self, passes: u8) -> Self {
        self.text_layout_passes = passes;
        self
    }

    /// Set the heading font-size ratio threshold.
    pub fn with_heading_threshold(mut self, threshold: f64) -> Self {
        self.heading_threshold = threshold;
        self
    }

    /// Set the maximum heading length.
    pub fn with_max_heading_length(mut self, length: usize) -> Self {
        self.max_heading_length = length;
        self
    }

    /// Set the paragraph gap factor.
    pub fn with_block_gap_factor(mut self, factor: f64) -> Self {
        self.block_gap_factor = factor;
        self
    }

    /// Enable or disable block merging.
    pub fn with_merge_same_style_lines(mut self, merge: bool) -> Self {
        self.merge_same_style_lines = merge;
        self
    }

    /// Enable or disable whitespace padding in positioned rows.
    pub fn with_whitespace_padding(mut self, enabled: bool) -> Self {
        self.whitespace_padding = enabled;
        self
    }

    /// Enable or disable flex rows in the semantic positioned strategy.
    pub fn with_flexbox_layout(mut self, enabled: bool) -> Self {
        self.use_flexbox_layout = enabled;
        self
    }

    /// Set the baseline tolerance factor.
    pub fn with_line_grouping_factor(mut self, factor: f64) -> Self {
        self.line_grouping_font_size_factor = factor;
        self
    }

    /// Set the layout adapter configuration.
    pub fn with_layout_adapter(mut self, adapter: LayoutAdapterConfig) -> Self {
        self.layout_adapter = adapter;
        self
    }

    /// Set the lexical model profile.
    pub fn with_classifier_profile(mut self, profile: impl Into<String>) -> Self {
        self.text_classifier_profile = profile.into();
        self
    }

    /// Enable or disable the "IMPORTANT NOTES" rewrite.
    pub fn with_important_notes_rewrite(mut self, enabled: bool) -> Self {
        self.important_notes_rewrite = enabled;
        self
    }

    /// Enable or disable plain text extraction.
    pub fn with_plain_text(mut self, enabled: bool) -> Self {
        self.emit_plain_text = enabled;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Check every option for a usable value.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("headingThreshold", self.heading_threshold),
            ("blockGapFactor", self.block_gap_factor),
            ("lineGroupingFontSizeFactor", self.line_grouping_font_size_factor),
            ("absElementLineHeightFactor", self.abs_element_line_height_factor),
            ("absRunLineHeightFactor", self.abs_run_line_height_factor),
            ("absLineHeightFactor", self.abs_line_height_factor),
            ("regionGapFactor", self.region_gap_factor),
            ("paragraphIndentFactor", self.paragraph_indent_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("obstacleMargin", self.obstacle_margin),
            ("layoutAdapter.rowThresholdPx", self.layout_adapter.row_threshold_px),
            ("layoutAdapter.minGapPx", self.layout_adapter.min_gap_px),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must not be negative, got {value}")));
            }
        }

        if !matches!(self.text_layout_passes, 1 | 2) {
            return Err(Error::InvalidConfig(format!(
                "textLayoutPasses must be 1 or 2, got {}",
                self.text_layout_passes
            )));
        }
        if self.max_heading_length == 0 {
            return Err(Error::InvalidConfig("maxHeadingLength must be at least 1".to_string()));
        }
        if !LexicalModel::is_known_profile(&self.text_classifier_profile) {
            return Err(Error::InvalidConfig(format!(
                "unknown textClassifierProfile {:?}",
                self.text_classifier_profile
            )));
        }
        Ok(())
    }

    /// Strategy resolved from `text_layout` and `preserve_layout`.
    pub fn strategy(&self) -> RenderStrategy {
        match (self.text_layout, self.preserve_layout) {
            (TextLayout::Absolute, false) => RenderStrategy::Absolute,
            (TextLayout::Absolute, true) => RenderStrategy::SvgText,
            (TextLayout::Flow, _) => RenderStrategy::Flow,
            (TextLayout::Semantic, _) => RenderStrategy::SemanticPositioned,
            (TextLayout::Smart, false) => RenderStrategy::Hybrid,
            (TextLayout::Smart, true) => RenderStrategy::SemanticPositioned,
        }
    }

    /// Whether the aggressive merge pass runs.
    pub fn aggressive_merge(&self) -> bool {
        self.text_layout_passes >= 2
            || self.text_pipeline == TextPipeline::Smart
            || matches!(
                self.strategy(),
                RenderStrategy::SemanticPositioned | RenderStrategy::Hybrid
            )
    }

    /// Whether lexical correction runs.
    pub fn lexical_enabled(&self) -> bool {
        self.text_pipeline == TextPipeline::Smart
    }

    /// Layout analyzer settings derived from these options.
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        let space_rule = match self.text_pipeline {
            TextPipeline::Legacy => SpaceRule::Legacy,
            TextPipeline::V2 | TextPipeline::Smart => SpaceRule::WordGap,
        };
        AnalyzerConfig {
            line_grouping_factor: self.line_grouping_font_size_factor,
            space_rule,
            aggressive_merge: self.aggressive_merge(),
            block_gap_factor: self.block_gap_factor,
            paragraph_indent_factor: self.paragraph_indent_factor,
            region_gap_factor: self.region_gap_factor,
            obstacle_margin: self.obstacle_margin,
            ..AnalyzerConfig::default()
        }
    }

    /// Classifier settings derived from these options.
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            heading_threshold: self.heading_threshold,
            max_heading_length: self.max_heading_length,
            merge_same_style_lines: self.merge_same_style_lines,
            important_notes_rewrite: self.important_notes_rewrite,
        }
    }
}

/// Page selection for conversion.
#[derive(Debug, Clone, Default)]
pub enum PageSelection {
    /// Convert all pages
    #[default]
    All,
    /// Convert a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Convert specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        let number = |part: &str| -> Result<u32> {
            part.trim()
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("invalid page number {part:?}")))
        };

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                return Ok(PageSelection::Range(number(start)?..=number(end)?));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            match part.split_once('-') {
                Some((start, end)) => pages.extend(number(start)?..=number(end)?),
                None => pages.push(number(part)?),
            }
        }
        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}
