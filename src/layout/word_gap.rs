//! Word-gap model: per-document thresholds separating kerning gaps from word gaps.
//!
//! Gaps between x-adjacent glyphs on a shared baseline are collected per
//! font-size bucket. Bucket membership depends on the baseline grouping
//! tolerance, so the model records the `line_grouping_font_size_factor` it
//! was built with and must be rebuilt when that factor changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{percentile, GlyphRun, TextRun};

use super::lines::group_by_baseline;

/// Minimum number of gap samples for a bucket to be trusted.
pub const MIN_GAP_SAMPLES: usize = 5;

/// Gaps below this fraction of the font size are kerning, not word gaps.
pub const KERNING_FLOOR_EM: f64 = 0.1;

/// Gaps above this multiple of the font size are column gaps, not word gaps.
pub const COLUMN_GAP_EM: f64 = 3.0;

/// Absolute floor (px) of the merge gap limit.
pub const MIN_MERGE_GAP: f64 = 3.0;

/// Gap statistics of one font-size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapStats {
    /// Median word gap
    pub median_word_gap: f64,
    /// 75th percentile word gap
    pub p75_word_gap: f64,
    /// Number of samples (0 for fallback statistics)
    pub samples: usize,
}

impl GapStats {
    /// Fallback statistics for a font size: `3 × fontScaleFactor` where the
    /// scale factor is `font_size / 10`.
    pub fn fallback(font_size: f64) -> Self {
        let gap = 3.0 * font_scale_factor(font_size);
        Self {
            median_word_gap: gap,
            p75_word_gap: gap,
            samples: 0,
        }
    }

    /// Gap at or above which a word boundary is assumed.
    pub fn space_threshold(&self, font_size: f64) -> f64 {
        if self.samples < MIN_GAP_SAMPLES {
            return self.p75_word_gap;
        }
        (0.5 * self.median_word_gap)
            .max(KERNING_FLOOR_EM * font_size)
            .min(self.p75_word_gap)
    }

    /// Largest gap across which same-style runs are still merged:
    /// `2 × max(p75, median, 3)`.
    pub fn merge_limit(&self) -> f64 {
        2.0 * self
            .p75_word_gap
            .max(self.median_word_gap)
            .max(MIN_MERGE_GAP)
    }
}

/// Font scale factor relative to a 10pt reference size.
pub fn font_scale_factor(font_size: f64) -> f64 {
    if font_size.is_finite() && font_size > 0.0 {
        font_size / 10.0
    } else {
        1.2
    }
}

/// Bucket key of a font size (nearest whole point).
fn bucket_key(font_size: f64) -> i64 {
    font_size.round() as i64
}

/// Per-document word-gap statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordGapModel {
    factor: f64,
    buckets: BTreeMap<i64, GapStats>,
}

impl WordGapModel {
    /// Build the model from glyphs. `factor` is the line grouping font size factor.
    pub fn build(glyphs: &[GlyphRun], factor: f64) -> Self {
        let runs: Vec<TextRun> = glyphs.iter().map(TextRun::from_glyph).collect();
        Self::build_from_runs(runs, factor)
    }

    /// Build the model from already-converted runs.
    pub fn build_from_runs(runs: Vec<TextRun>, factor: f64) -> Self {
        let mut samples: BTreeMap<i64, Vec<f64>> = BTreeMap::new();

        for group in group_by_baseline(runs, factor) {
            let mut anchor: Option<&TextRun> = None;
            for run in &group {
                if run.is_whitespace() {
                    // The gap spanning an explicit space is a word gap
                    continue;
                }
                if let Some(prev) = anchor {
                    let fs = prev.font_size().max(run.font_size());
                    let gap = run.x - prev.right();
                    if gap > KERNING_FLOOR_EM * fs && gap < COLUMN_GAP_EM * fs {
                        samples.entry(bucket_key(fs)).or_default().push(gap);
                    }
                }
                anchor = Some(run);
            }
        }

        let buckets = samples
            .into_iter()
            .filter_map(|(key, gaps)| {
                let median_word_gap = percentile(&gaps, 0.5)?;
                let p75_word_gap = percentile(&gaps, 0.75)?;
                Some((
                    key,
                    GapStats {
                        median_word_gap,
                        p75_word_gap,
                        samples: gaps.len(),
                    },
                ))
            })
            .collect();

        Self { factor, buckets }
    }

    /// Factor the model was built with.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Whether the model must be rebuilt for a new grouping factor.
    pub fn is_stale(&self, factor: f64) -> bool {
        (self.factor - factor).abs() > f64::EPSILON
    }

    /// Statistics for a font size (fallback when the bucket is too small).
    pub fn stats_for(&self, font_size: f64) -> GapStats {
        match self.buckets.get(&bucket_key(font_size)) {
            Some(stats) if stats.samples >= MIN_GAP_SAMPLES => *stats,
            _ => GapStats::fallback(font_size),
        }
    }

    /// Median word gap for a font size.
    pub fn median_word_gap(&self, font_size: f64) -> f64 {
        self.stats_for(font_size).median_word_gap
    }

    /// 75th percentile word gap for a font size.
    pub fn p75_word_gap(&self, font_size: f64) -> f64 {
        self.stats_for(font_size).p75_word_gap
    }

    /// Number of trusted buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets
            .values()
            .filter(|s| s.samples >= MIN_GAP_SAMPLES)
            .count()
    }
}

/// Decide whether a space separates `prev` and `next` on one baseline.
///
/// Combines the gap relative to the model's threshold, lowercase→uppercase
/// case boundaries, alphanumeric adjacency, and whitespace already present in
/// either run.
pub fn should_insert_space(prev: &TextRun, next: &TextRun, model: &WordGapModel) -> bool {
    let gap = next.x - prev.right();
    should_insert_space_with_gap(prev, next, gap, model)
}

/// [`should_insert_space`] with an externally computed gap.
pub fn should_insert_space_with_gap(
    prev: &TextRun,
    next: &TextRun,
    gap: f64,
    model: &WordGapModel,
) -> bool {
    let (prev_last, next_first) = match (prev.text.chars().last(), next.text.chars().next()) {
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };

    if prev_last.is_whitespace() || next_first.is_whitespace() || prev_last == '\u{00A0}' {
        return false;
    }
    if is_spaceless_script_char(prev_last) && is_spaceless_script_char(next_first) {
        return false;
    }

    let fs = prev.font_size().max(next.font_size());
    let threshold = model.stats_for(fs).space_threshold(fs);

    if gap >= threshold {
        return true;
    }
    if gap <= 0.0 {
        return false;
    }

    let moderate = gap >= 0.5 * threshold;
    if prev_last.is_lowercase() && next_first.is_uppercase() {
        return moderate;
    }
    if prev_last.is_alphanumeric() && next_first.is_alphanumeric() {
        return false;
    }
    if matches!(prev_last, ',' | ';' | ':' | '!' | '?' | ')') && next_first.is_alphanumeric() {
        return moderate;
    }
    false
}

/// Simple gap-ratio space rule: a space when the gap exceeds 20% of the
/// average character width of `next`, except between spaceless-script
/// characters or when either side already carries whitespace.
pub fn legacy_should_insert_space(prev: &TextRun, next: &TextRun) -> bool {
    let gap = next.x - prev.right();

    let char_count = next.char_count();
    let avg_char_width = if char_count > 0 && next.width > 0.0 {
        next.width / char_count as f64
    } else {
        next.font_size() * 0.5
    };

    let prev_last_char = prev.text.chars().last();
    let curr_first_char = next.text.chars().next();

    let should_insert = if gap > avg_char_width * 0.2 {
        let prev_is_cjk = prev_last_char.map(is_spaceless_script_char).unwrap_or(false);
        let curr_is_cjk = curr_first_char.map(is_spaceless_script_char).unwrap_or(false);
        !(prev_is_cjk && curr_is_cjk)
    } else {
        false
    };

    let prev_ends_with_space = prev.text.ends_with(' ') || prev.text.ends_with('\u{00A0}');
    let curr_starts_with_space = next.text.starts_with(' ') || next.text.starts_with('\u{00A0}');

    should_insert && !prev_ends_with_space && !curr_starts_with_space
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code)
    // CJK Unified Ideographs Extension A
    || (0x3400..=0x4DBF).contains(&code)
    // CJK Unified Ideographs Extension B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana and Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, x: f64, width: f64) -> TextRun {
        TextRun::from_glyph(&GlyphRun::new(text, x, 100.0, width, 12.0, "Helvetica"))
    }

    fn spaced_words(count: usize, gap: f64) -> Vec<GlyphRun> {
        let mut x = 0.0;
        (0..count)
            .map(|_| {
                let g = GlyphRun::new("word", x, 100.0, 24.0, 12.0, "Helvetica");
                x += 24.0 + gap;
                g
            })
            .collect()
    }

    #[test]
    fn test_fallback_for_small_samples() {
        let model = WordGapModel::build(&spaced_words(3, 3.0), 0.35);
        let stats = model.stats_for(12.0);
        assert_eq!(stats.samples, 0);
        assert!((stats.p75_word_gap - 3.6).abs() < 1e-9);
        assert!((stats.merge_limit() - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_bucket_statistics() {
        let model = WordGapModel::build(&spaced_words(10, 3.0), 0.35);
        let stats = model.stats_for(12.0);
        assert_eq!(stats.samples, 9);
        assert!((stats.median_word_gap - 3.0).abs() < 1e-9);
        assert_eq!(model.bucket_count(), 1);
        // Other sizes fall back
        assert_eq!(model.stats_for(24.0).samples, 0);
    }

    #[test]
    fn test_staleness() {
        let model = WordGapModel::build(&[], 0.35);
        assert!(!model.is_stale(0.35));
        assert!(model.is_stale(0.5));
    }

    #[test]
    fn test_should_insert_space_large_gap() {
        let model = WordGapModel::default();
        let hello = run("Hello", 70.0, 30.0);
        let world = run("World", 130.0, 30.0);
        assert!(should_insert_space(&hello, &world, &model));
    }

    #[test]
    fn test_no_space_for_kerning() {
        let model = WordGapModel::default();
        assert!(!should_insert_space(&run("Hel", 0.0, 15.0), &run("lo", 15.2, 10.0), &model));
    }

    #[test]
    fn test_case_boundary_with_moderate_gap() {
        let model = WordGapModel::default();
        // threshold 3.6 at 12pt, 2.0 is above half of it
        assert!(should_insert_space(&run("end", 0.0, 18.0), &run("Next", 20.0, 24.0), &model));
        assert!(!should_insert_space(&run("end", 0.0, 18.0), &run("next", 20.0, 24.0), &model));
    }

    #[test]
    fn test_existing_whitespace_and_cjk() {
        let model = WordGapModel::default();
        assert!(!should_insert_space(&run("Hello ", 0.0, 30.0), &run("World", 60.0, 30.0), &model));
        assert!(!should_insert_space(&run("漢", 0.0, 12.0), &run("字", 30.0, 12.0), &model));
    }

    #[test]
    fn test_legacy_rule() {
        let hello = run("Hello", 0.0, 30.0);
        assert!(legacy_should_insert_space(&hello, &run("World", 33.0, 30.0)));
        assert!(!legacy_should_insert_space(&hello, &run("World", 30.5, 30.0)));
    }

    #[test]
    fn test_spaceless_script() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('あ'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
