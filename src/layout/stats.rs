//! Document-wide statistics.
//!
//! Computed once per document from every page's glyphs and treated as
//! read-only input by the per-page analysis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{median, GlyphRun, PageInput, TextRun, DEFAULT_FONT_SIZE};

use super::lines::group_by_baseline;
use super::word_gap::WordGapModel;

/// Line height as a multiple of the font size when no line pairs exist.
pub const DEFAULT_LINE_HEIGHT_RATIO: f64 = 1.2;

/// Baseline deltas above this multiple of the font size are paragraph or
/// region gaps, not line pitch.
const MAX_LINE_PITCH_EM: f64 = 3.0;

/// Scalar statistics shared by every page of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    /// Character-weighted median font size (body text size)
    pub median_font_size: f64,
    /// Median baseline-to-baseline distance of consecutive lines
    pub median_line_height: f64,
    /// Word gap percentiles per font-size bucket
    pub word_gaps: WordGapModel,
    /// Font sizes (in tenths of a point) with character counts
    pub size_histogram: BTreeMap<i64, usize>,
}

impl Default for DocumentStats {
    fn default() -> Self {
        Self {
            median_font_size: DEFAULT_FONT_SIZE,
            median_line_height: DEFAULT_FONT_SIZE * DEFAULT_LINE_HEIGHT_RATIO,
            word_gaps: WordGapModel::default(),
            size_histogram: BTreeMap::new(),
        }
    }
}

impl DocumentStats {
    /// Compute statistics over all pages.
    pub fn from_pages(pages: &[PageInput], factor: f64) -> Self {
        let glyphs: Vec<Vec<GlyphRun>> = pages.iter().map(PageInput::sanitized_glyphs).collect();
        Self::from_glyph_pages(&glyphs, factor)
    }

    /// Compute statistics from per-page glyph lists.
    pub fn from_glyph_pages(pages: &[Vec<GlyphRun>], factor: f64) -> Self {
        let mut size_histogram: BTreeMap<i64, usize> = BTreeMap::new();
        let mut pitches = Vec::new();
        let mut all_runs = Vec::new();

        for glyphs in pages {
            for glyph in glyphs {
                let chars = glyph.text.chars().filter(|c| !c.is_whitespace()).count();
                if chars > 0 {
                    *size_histogram.entry(size_key(glyph.font_size)).or_insert(0) += chars;
                }
            }

            let runs: Vec<TextRun> = glyphs.iter().map(TextRun::from_glyph).collect();
            pitches.extend(line_pitches(&runs, factor));
            all_runs.extend(runs);
        }

        let median_font_size = weighted_median(&size_histogram).unwrap_or(DEFAULT_FONT_SIZE);
        let median_line_height =
            median(&pitches).unwrap_or(median_font_size * DEFAULT_LINE_HEIGHT_RATIO);
        let word_gaps = WordGapModel::build_from_runs(all_runs, factor);

        log::debug!(
            "DocumentStats: median font {:.2}, median line height {:.2}, {} gap bucket(s)",
            median_font_size,
            median_line_height,
            word_gaps.bucket_count()
        );

        Self {
            median_font_size,
            median_line_height,
            word_gaps,
            size_histogram,
        }
    }

    /// Rebuild the word-gap model if it was built with a different grouping factor.
    pub fn ensure_factor(&mut self, pages: &[PageInput], factor: f64) {
        if self.word_gaps.is_stale(factor) {
            log::debug!("DocumentStats: rebuilding word-gap model for factor {factor}");
            *self = Self::from_pages(pages, factor);
        }
    }
}

fn size_key(font_size: f64) -> i64 {
    (font_size * 10.0).round() as i64
}

fn weighted_median(histogram: &BTreeMap<i64, usize>) -> Option<f64> {
    let total: usize = histogram.values().sum();
    if total == 0 {
        return None;
    }
    let half = total.div_ceil(2);
    let mut seen = 0;
    for (key, count) in histogram {
        seen += count;
        if seen >= half {
            return Some(*key as f64 / 10.0);
        }
    }
    None
}

/// Positive baseline deltas between consecutive lines of one page.
fn line_pitches(runs: &[TextRun], factor: f64) -> Vec<f64> {
    let groups = group_by_baseline(runs.to_vec(), factor);
    groups
        .windows(2)
        .filter_map(|pair| {
            let upper = pair[0].first()?;
            let lower = pair[1].first()?;
            let fs = upper.font_size().max(lower.font_size());
            let delta = upper.y - lower.y;
            (delta > 0.0 && delta <= MAX_LINE_PITCH_EM * fs).then_some(delta)
        })
        .collect()
}
