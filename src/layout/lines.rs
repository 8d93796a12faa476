//! Baseline grouping and line clustering.

use serde::{Deserialize, Serialize};

use crate::model::{Line, TextRun};

use super::word_gap::{legacy_should_insert_space, should_insert_space, WordGapModel};

/// Smallest baseline tolerance in pixels.
pub const MIN_BASELINE_TOLERANCE: f64 = 0.75;

/// Baseline tolerance for two runs: `max(0.75, factor × max(heights))`.
pub fn baseline_tolerance(height_a: f64, height_b: f64, factor: f64) -> f64 {
    (factor * height_a.max(height_b)).max(MIN_BASELINE_TOLERANCE)
}

/// Sort runs by `(y desc, x asc)` and group those sharing a baseline.
///
/// Each group is sorted left to right; groups are returned top to bottom.
pub fn group_by_baseline(mut runs: Vec<TextRun>, factor: f64) -> Vec<Vec<TextRun>> {
    runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut groups: Vec<Vec<TextRun>> = Vec::new();
    let mut current: Vec<TextRun> = Vec::new();
    let mut group_y = 0.0;
    let mut max_height: f64 = 0.0;

    for run in runs {
        if current.is_empty() {
            group_y = run.y;
            max_height = run.height;
            current.push(run);
            continue;
        }

        let tolerance = baseline_tolerance(max_height, run.height, factor);
        if (group_y - run.y).abs() <= tolerance {
            max_height = max_height.max(run.height);
            current.push(run);
        } else {
            groups.push(sorted_by_x(std::mem::take(&mut current)));
            group_y = run.y;
            max_height = run.height;
            current.push(run);
        }
    }

    if !current.is_empty() {
        groups.push(sorted_by_x(current));
    }

    groups
}

fn sorted_by_x(mut runs: Vec<TextRun>) -> Vec<TextRun> {
    runs.sort_by(|a, b| a.x.total_cmp(&b.x));
    runs
}

/// Rule deciding word boundaries between adjacent runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpaceRule {
    /// Gap above 20% of the average character width
    Legacy,
    /// Word-gap model thresholds with case and punctuation cues
    #[default]
    WordGap,
}

impl SpaceRule {
    /// Whether a space separates the two runs.
    pub fn decide(&self, prev: &TextRun, next: &TextRun, model: &WordGapModel) -> bool {
        match self {
            SpaceRule::Legacy => legacy_should_insert_space(prev, next),
            SpaceRule::WordGap => should_insert_space(prev, next, model),
        }
    }
}

/// Cluster runs into lines and decide inter-run word boundaries.
pub fn cluster_lines(
    runs: Vec<TextRun>,
    factor: f64,
    rule: SpaceRule,
    model: &WordGapModel,
) -> Vec<Line> {
    group_by_baseline(runs, factor)
        .into_iter()
        .map(|group| {
            let space_before: Vec<bool> = group
                .iter()
                .enumerate()
                .map(|(i, run)| i > 0 && rule.decide(&group[i - 1], run, model))
                .collect();
            Line::new(group, space_before)
        })
        .collect()
}
