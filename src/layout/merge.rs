//! Glyph/run merger.
//!
//! Merges x-adjacent glyph runs sharing a style into [`TextRun`]s, deciding
//! where to insert spaces. Explicit whitespace glyphs are held in a
//! [`SpaceState::PendingSpace`] state until the next visible glyph decides
//! whether they stay inside the current run or close it.

use regex::Regex;
use std::sync::OnceLock;

use crate::model::{GlyphRun, TextRun};

use super::lines::{group_by_baseline, SpaceRule};
use super::width::effective_width;
use super::word_gap::{should_insert_space_with_gap, WordGapModel};

/// Overlap (in em) beyond which a glyph is considered a separate text flow.
const MAX_OVERLAP_EM: f64 = 1.0;

/// Options controlling a merge pass.
#[derive(Debug, Clone, Copy)]
pub struct MergeConfig {
    /// Baseline grouping factor
    pub line_grouping_factor: f64,
    /// Space decision rule
    pub space_rule: SpaceRule,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            line_grouping_factor: 0.35,
            space_rule: SpaceRule::WordGap,
        }
    }
}

/// Space bookkeeping while walking a baseline group.
#[derive(Debug, Clone, PartialEq)]
enum SpaceState {
    /// No whitespace waiting
    Idle,
    /// Whitespace glyph(s) seen after visible text ending at `anchor_x`
    PendingSpace { anchor_x: f64, text: String },
}

/// Merge glyph runs into text runs.
pub fn merge_glyphs(glyphs: &[GlyphRun], model: &WordGapModel, config: &MergeConfig) -> Vec<TextRun> {
    let runs: Vec<TextRun> = glyphs.iter().map(TextRun::from_glyph).collect();
    merge_text_runs(runs, model, config)
}

/// Merge runs sharing a baseline and style.
///
/// Runs merge while styles match and the gap stays below
/// `2 × max(p75, median, 3)`. Merging an already merged list yields the same list.
pub fn merge_text_runs(runs: Vec<TextRun>, model: &WordGapModel, config: &MergeConfig) -> Vec<TextRun> {
    let mut out = Vec::with_capacity(runs.len());
    for group in group_by_baseline(runs, config.line_grouping_factor) {
        merge_group(group, model, config, &mut out);
    }
    out
}

fn merge_group(group: Vec<TextRun>, model: &WordGapModel, config: &MergeConfig, out: &mut Vec<TextRun>) {
    let mut current: Option<TextRun> = None;
    let mut state = SpaceState::Idle;

    for next in group {
        let Some(cur) = current.as_mut() else {
            current = Some(next);
            state = SpaceState::Idle;
            continue;
        };

        let anchor_x = match &state {
            SpaceState::Idle => cur.right(),
            SpaceState::PendingSpace { anchor_x, .. } => *anchor_x,
        };
        let gap = next.x - anchor_x;
        let fs = cur.font_size().max(next.font_size());
        let stats = model.stats_for(fs);

        let abbreviation = is_abbreviation_join(cur, &next, gap, stats.space_threshold(fs));
        let joinable = cur.style.matches(&next.style)
            && gap > -MAX_OVERLAP_EM * fs
            && (gap < stats.merge_limit() || abbreviation);

        if !joinable {
            if let SpaceState::PendingSpace { text, .. } = std::mem::replace(&mut state, SpaceState::Idle) {
                cur.text.push_str(&text);
            }
            if let Some(done) = current.take() {
                out.push(done);
            }
            current = Some(next);
            continue;
        }

        if next.is_whitespace() {
            let (anchor_x, mut text) = match std::mem::replace(&mut state, SpaceState::Idle) {
                SpaceState::Idle => (cur.right(), String::new()),
                SpaceState::PendingSpace { anchor_x, text } => (anchor_x, text),
            };
            text.push_str(&next.text);
            cur.absorb(&next_as_empty(&next), false);
            state = SpaceState::PendingSpace { anchor_x, text };
            continue;
        }

        match std::mem::replace(&mut state, SpaceState::Idle) {
            SpaceState::PendingSpace { text, .. } => {
                cur.text.push_str(&text);
                cur.absorb(&next, false);
            }
            SpaceState::Idle => {
                let insert = !abbreviation
                    && match config.space_rule {
                        SpaceRule::WordGap => should_insert_space_with_gap(cur, &next, gap, model),
                        SpaceRule::Legacy => config.space_rule.decide(cur, &next, model),
                    };
                log::trace!("merge {:?} + {:?}: gap {:.2}, space {}", cur.text, next.text, gap, insert);
                cur.absorb(&next, insert);
            }
        }
    }

    if let Some(mut cur) = current {
        if let SpaceState::PendingSpace { text, .. } = state {
            cur.text.push_str(&text);
        }
        out.push(cur);
    }
}

/// A whitespace run reduced to its box, so absorbing it extends the
/// geometry without adding text (the text is carried by the pending state).
fn next_as_empty(run: &TextRun) -> TextRun {
    TextRun {
        text: String::new(),
        glyph_count: run.glyph_count,
        ..run.clone()
    }
}

fn dotted_abbreviation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[^\p{L}\p{N}])(?:\p{L}\.)*\p{L}\.$|\p{N}\.$").expect("valid regex")
    })
}

/// A single `.` between two alphanumeric characters with a small gap is part
/// of the word (dotted abbreviation or decimal number), not a sentence end.
///
/// The left side must end in a dotted abbreviation ("e.g.", "U.S.") or a
/// digit followed by `.`, and the right side must start with a digit or a
/// lowercase letter.
fn is_abbreviation_join(prev: &TextRun, next: &TextRun, gap: f64, space_tolerance: f64) -> bool {
    let Some(first) = next.text.chars().next() else {
        return false;
    };
    if !(first.is_ascii_digit() || first.is_lowercase()) {
        return false;
    }
    if !prev.text.ends_with('.') {
        return false;
    }
    let before_dot = prev.text.chars().rev().nth(1);
    if !before_dot.map(char::is_alphanumeric).unwrap_or(false) {
        return false;
    }
    // A digit on the left only joins a digit on the right (decimals)
    if before_dot.map(|c| c.is_ascii_digit()).unwrap_or(false) && !first.is_ascii_digit() {
        return false;
    }
    if !dotted_abbreviation().is_match(&prev.text) {
        return false;
    }
    let fs = prev.font_size().max(next.font_size());
    gap < (space_tolerance * 2.5).max(fs * 1.25)
}

/// Second, aggressive pass: re-merge same-style neighbours when a reported
/// width is implausible, re-deciding the gap against a width re-estimated
/// from character classes.
pub fn aggressive_merge(runs: Vec<TextRun>, model: &WordGapModel, config: &MergeConfig) -> Vec<TextRun> {
    let mut out = Vec::with_capacity(runs.len());

    for group in group_by_baseline(runs, config.line_grouping_factor) {
        let mut current: Option<TextRun> = None;
        for next in group {
            let Some(cur) = current.as_mut() else {
                current = Some(next);
                continue;
            };

            let suspicious = !cur.has_plausible_width() || !next.has_plausible_width();
            if !suspicious || !cur.style.matches(&next.style) {
                if let Some(done) = current.replace(next) {
                    out.push(done);
                }
                continue;
            }

            let fs = cur.font_size().max(next.font_size());
            let corrected_right = cur.x + effective_width(&cur.text, cur.width, cur.font_size());
            let gap = next.x - corrected_right;
            let stats = model.stats_for(fs);

            if gap > -MAX_OVERLAP_EM * fs && gap < stats.merge_limit() {
                let insert = gap >= stats.space_threshold(fs)
                    && !cur.text.ends_with(char::is_whitespace)
                    && !next.text.starts_with(char::is_whitespace);
                log::trace!(
                    "aggressive merge {:?} + {:?}: corrected gap {:.2}, space {}",
                    cur.text,
                    next.text,
                    gap,
                    insert
                );
                cur.width = cur.width.max(corrected_right - cur.x);
                let next_fixed = TextRun {
                    width: effective_width(&next.text, next.width, next.font_size()),
                    ..next
                };
                cur.absorb(&next_fixed, insert);
            } else if let Some(done) = current.replace(next) {
                out.push(done);
            }
        }
        if let Some(cur) = current {
            out.push(cur);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FontStyle;

    fn glyph(text: &str, x: f64, width: f64) -> GlyphRun {
        GlyphRun::new(text, x, 700.0, width, 12.0, "Helvetica")
    }

    fn non_ws(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_merge_adjacent_glyphs() {
        let glyphs = vec![
            glyph("H", 0.0, 6.0),
            glyph("e", 6.0, 5.0),
            glyph("l", 11.0, 4.0),
            glyph("l", 15.0, 4.0),
            glyph("o", 19.0, 6.0),
        ];
        let runs = merge_glyphs(&glyphs, &WordGapModel::default(), &MergeConfig::default());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello");
        assert_eq!(runs[0].glyph_count, 5);
        assert_eq!(runs[0].width, 25.0);
    }

    #[test]
    fn test_far_runs_stay_separate() {
        let glyphs = vec![glyph("Hello", 70.0, 30.0), glyph("World", 130.0, 30.0)];
        let runs = merge_glyphs(&glyphs, &WordGapModel::default(), &MergeConfig::default());
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn test_inserts_space_for_word_gap() {
        let glyphs = vec![glyph("Hello", 0.0, 30.0), glyph("World", 34.0, 30.0)];
        let runs = merge_glyphs(&glyphs, &WordGapModel::default(), &MergeConfig::default());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello World");
    }

    #[test]
    fn test_explicit_whitespace_glyph_kept_once() {
        let glyphs = vec![
            glyph("Hello", 0.0, 30.0),
            glyph(" ", 30.0, 3.0),
            glyph("World", 34.0, 30.0),
        ];
        let runs = merge_glyphs(&glyphs, &WordGapModel::default(), &MergeConfig::default());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello World");
    }

    #[test]
    fn test_trailing_whitespace_not_dropped() {
        let glyphs = vec![glyph("End", 0.0, 18.0), glyph(" ", 18.0, 3.0)];
        let runs = merge_glyphs(&glyphs, &WordGapModel::default(), &MergeConfig::default());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "End ");
    }

    #[test]
    fn test_style_change_splits() {
        let glyphs = vec![
            glyph("plain", 0.0, 25.0),
            glyph("italic", 25.0, 25.0).with_style(FontStyle::Italic),
        ];
        let runs = merge_glyphs(&glyphs, &WordGapModel::default(), &MergeConfig::default());
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn test_decimal_and_abbreviation() {
        let model = WordGapModel::default();
        let runs = merge_glyphs(
            &[glyph("3.", 0.0, 9.0), glyph("14", 13.0, 12.0)],
            &model,
            &MergeConfig::default(),
        );
        assert_eq!(runs[0].text, "3.14");

        let runs = merge_glyphs(
            &[glyph("e.g.", 0.0, 18.0), glyph("the", 22.0, 16.0)],
            &model,
            &MergeConfig::default(),
        );
        assert_eq!(runs[0].text, "e.g.the");

        // Sentence end before a capital keeps its space
        let runs = merge_glyphs(
            &[glyph("end.", 0.0, 20.0), glyph("Next", 24.0, 24.0)],
            &model,
            &MergeConfig::default(),
        );
        assert_eq!(runs[0].text, "end. Next");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let glyphs = vec![
            glyph("The", 0.0, 18.0),
            glyph("quick", 22.0, 27.0),
            glyph("brown", 53.0, 30.0),
            glyph("fox", 200.0, 16.0),
            GlyphRun::new("Next", 0.0, 680.0, 24.0, 12.0, "Helvetica"),
        ];
        let model = WordGapModel::default();
        let config = MergeConfig::default();
        let once = merge_glyphs(&glyphs, &model, &config);
        let twice = merge_text_runs(once.clone(), &model, &config);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_character_loss() {
        let glyphs = vec![
            glyph("A", 0.0, 7.0),
            glyph("b", 7.5, 6.0),
            glyph(" ", 13.5, 3.0),
            glyph("c", 18.0, 6.0),
            glyph("d", 90.0, 6.0),
        ];
        let runs = merge_glyphs(&glyphs, &WordGapModel::default(), &MergeConfig::default());
        let input: String = glyphs.iter().map(|g| non_ws(&g.text)).collect();
        let output: String = runs.iter().map(|r| non_ws(&r.text)).collect();
        assert_eq!(input, output);
    }

    #[test]
    fn test_aggressive_merge_fixes_implausible_width() {
        // "Hello" reported 1px wide; its estimated width is ~26px
        let runs = vec![
            TextRun::from_glyph(&glyph("Hello", 0.0, 1.0)),
            TextRun::from_glyph(&glyph("World", 30.0, 30.0)),
        ];
        let model = WordGapModel::default();
        let primary = merge_text_runs(runs.clone(), &model, &MergeConfig::default());
        assert_eq!(primary.len(), 2);

        let merged = aggressive_merge(runs, &model, &MergeConfig::default());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "Hello World");
    }
}
