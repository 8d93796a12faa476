//! Layout analysis: glyph merging, line clustering, regions and paragraphs.
//!
//! The analyzer turns one page of backend glyphs into a [`PageLayout`]. It
//! reads document-wide statistics but never mutates them, so pages can be
//! analyzed in any order.

pub mod lines;
pub mod merge;
pub mod paragraphs;
pub mod regions;
pub mod stats;
pub mod table_detector;
pub mod width;
pub mod word_gap;

pub use lines::{baseline_tolerance, cluster_lines, group_by_baseline, SpaceRule};
pub use merge::{aggressive_merge, merge_glyphs, merge_text_runs, MergeConfig};
pub use paragraphs::{group_paragraphs, join_kind, ParagraphConfig};
pub use regions::{partition_regions, RegionConfig};
pub use stats::DocumentStats;
pub use table_detector::{DetectedGrid, TableDetector, TableDetectorConfig};
pub use word_gap::{should_insert_space, GapStats, WordGapModel};

use crate::error::{Error, Result};
use crate::model::{GlyphRun, Line, LineToken, PageInput, PageLayout, TextRun};

/// Tuning options of the layout analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Baseline tolerance factor (× font size)
    pub line_grouping_factor: f64,
    /// Word boundary rule
    pub space_rule: SpaceRule,
    /// Run the aggressive second merge pass
    pub aggressive_merge: bool,
    /// Paragraph baseline gap factor (× median line height)
    pub block_gap_factor: f64,
    /// Paragraph indent delta factor (× font size)
    pub paragraph_indent_factor: f64,
    /// Region gap factor (× median line height)
    pub region_gap_factor: f64,
    /// Obstacle adjacency margin in px
    pub obstacle_margin: f64,
    /// Grid detection settings
    pub table: TableDetectorConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            line_grouping_factor: 0.35,
            space_rule: SpaceRule::WordGap,
            aggressive_merge: false,
            block_gap_factor: 1.8,
            paragraph_indent_factor: 1.0,
            region_gap_factor: 2.5,
            obstacle_margin: 4.0,
            table: TableDetectorConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Enable or disable the aggressive merge pass.
    pub fn with_aggressive_merge(mut self, enabled: bool) -> Self {
        self.aggressive_merge = enabled;
        self
    }

    /// Set the word boundary rule.
    pub fn with_space_rule(mut self, rule: SpaceRule) -> Self {
        self.space_rule = rule;
        self
    }

    fn merge_config(&self) -> MergeConfig {
        MergeConfig {
            line_grouping_factor: self.line_grouping_factor,
            space_rule: self.space_rule,
        }
    }
}

/// Per-page layout analyzer over read-only document statistics.
pub struct LayoutAnalyzer<'a> {
    stats: &'a DocumentStats,
    config: AnalyzerConfig,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(stats: &'a DocumentStats, config: AnalyzerConfig) -> Self {
        Self { stats, config }
    }

    /// Document statistics in use.
    pub fn stats(&self) -> &DocumentStats {
        self.stats
    }

    /// Analyzer configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Merge glyphs into text runs (with the aggressive pass when enabled).
    pub fn merge_text_runs(&self, items: &[GlyphRun]) -> Vec<TextRun> {
        let glyphs: Vec<GlyphRun> = items
            .iter()
            .filter(|g| !g.text.is_empty())
            .map(GlyphRun::sanitized)
            .collect();
        let merge_config = self.config.merge_config();
        let runs = merge_glyphs(&glyphs, &self.stats.word_gaps, &merge_config);
        if self.config.aggressive_merge {
            aggressive_merge(runs, &self.stats.word_gaps, &merge_config)
        } else {
            runs
        }
    }

    /// Merged runs clustered into lines, top to bottom.
    pub fn lines(&self, runs: Vec<TextRun>) -> Vec<Line> {
        cluster_lines(
            runs,
            self.config.line_grouping_factor,
            self.config.space_rule,
            &self.stats.word_gaps,
        )
    }

    /// Token stream of the items' text with explicit word boundaries.
    ///
    /// Items on different baselines are joined with a single space token.
    pub fn reconstruct_line_tokens(&self, items: &[GlyphRun]) -> Vec<LineToken> {
        let runs = self.merge_text_runs(items);
        let mut tokens = Vec::new();
        for line in self.lines(runs) {
            if !tokens.is_empty() {
                tokens.push(LineToken::Space);
            }
            tokens.extend(line.tokens());
        }
        tokens
    }

    /// Plain text of the items with reconstructed word boundaries.
    pub fn reconstruct_line_text(&self, items: &[GlyphRun]) -> String {
        crate::model::tokens_to_text(&self.reconstruct_line_tokens(items))
    }

    /// Analyze one page into regions, lines and paragraphs.
    pub fn analyze_page(&self, page: &PageInput) -> Result<PageLayout> {
        page.validate()?;

        let runs = self.merge_text_runs(&page.glyphs);
        let lines: Vec<Line> = self.lines(runs).into_iter().filter(|l| !l.is_blank()).collect();

        if lines.iter().any(|l| !l.rect.is_finite()) {
            return Err(Error::analysis(page.number, "non-finite line geometry"));
        }

        let region_config = RegionConfig {
            region_gap_factor: self.config.region_gap_factor,
            obstacle_margin: self.config.obstacle_margin,
            median_line_height: self.stats.median_line_height,
            table: self.config.table.clone(),
        };
        let paragraph_config = ParagraphConfig {
            block_gap_factor: self.config.block_gap_factor,
            paragraph_indent_factor: self.config.paragraph_indent_factor,
            median_line_height: self.stats.median_line_height,
        };

        let mut regions = partition_regions(lines, &page.obstacles, &region_config);
        for region in regions.iter_mut().filter(|r| r.flow_allowed) {
            region.paragraphs = group_paragraphs(region, &paragraph_config);
        }

        log::debug!(
            "page {}: {} region(s), {} line(s)",
            page.number,
            regions.len(),
            regions.iter().map(|r| r.lines.len()).sum::<usize>()
        );

        Ok(PageLayout {
            number: page.number,
            width: page.width,
            height: page.height,
            regions,
            obstacles: page.obstacles.clone(),
        })
    }
}
