//! Region partitioning and flow eligibility.
//!
//! Lines are swept top to bottom. A new region starts whenever the line's
//! obstacle adjacency differs from the current region's, the vertical gap
//! exceeds `region_gap_factor × median_line_height`, or the line does not
//! overlap the region horizontally. Regions containing a detected grid are
//! then split so the grid rows form their own region.

use crate::model::{FlowBlocker, Line, Obstacle, Rect, Region};

use super::table_detector::{TableDetector, TableDetectorConfig};

/// Share of the smaller line height two consecutive line boxes may overlap
/// before the region counts as layered text.
pub const LINE_OVERLAP_RATIO: f64 = 0.25;

/// Number of border-like graphics at which a region is treated as a ruled grid.
pub const BORDER_GRID_COUNT: usize = 2;

/// Region partitioning configuration.
#[derive(Debug, Clone)]
pub struct RegionConfig {
    /// Vertical gap (in median line heights) that separates regions
    pub region_gap_factor: f64,
    /// Distance (px) within which an obstacle counts as adjacent
    pub obstacle_margin: f64,
    /// Document median line height
    pub median_line_height: f64,
    /// Grid detection settings
    pub table: TableDetectorConfig,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            region_gap_factor: 2.5,
            obstacle_margin: 4.0,
            median_line_height: 14.4,
            table: TableDetectorConfig::default(),
        }
    }
}

/// Partition a page's lines into regions and decide flow eligibility.
///
/// Paragraphs are not grouped here; see [`super::paragraphs`].
pub fn partition_regions(mut lines: Vec<Line>, obstacles: &[Obstacle], config: &RegionConfig) -> Vec<Region> {
    lines.sort_by(|a, b| b.baseline.total_cmp(&a.baseline).then(a.x().total_cmp(&b.x())));

    let detector = TableDetector::with_config(config.table.clone());
    let mut regions = Vec::new();

    for group in sweep(lines, obstacles, config) {
        for (part, grid) in split_grids(group, &detector) {
            let index = regions.len();
            regions.push(build_region(index, part, grid, obstacles, config));
        }
    }

    log::debug!(
        "partition_regions: {} region(s), {} flow-eligible",
        regions.len(),
        regions.iter().filter(|r| r.flow_allowed).count()
    );
    regions
}

/// Whether a rectangle overlaps or sits within `margin` of a non-border obstacle.
pub fn near_obstacle(rect: &Rect, obstacles: &[Obstacle], margin: f64) -> bool {
    let zone = rect.expand(margin);
    obstacles
        .iter()
        .filter(|o| !o.is_border_like())
        .any(|o| zone.intersects(&o.rect))
}

/// Whether any two consecutive line boxes overlap vertically by more than
/// [`LINE_OVERLAP_RATIO`] of the smaller height.
pub fn has_overlapping_lines(lines: &[Line]) -> bool {
    lines.windows(2).any(|pair| {
        let (a, b) = (&pair[0].rect, &pair[1].rect);
        let min_height = a.height.min(b.height);
        min_height > 0.0
            && a.horizontal_overlap(b) > 0.0
            && a.vertical_overlap(b) > LINE_OVERLAP_RATIO * min_height
    })
}

fn sweep(lines: Vec<Line>, obstacles: &[Obstacle], config: &RegionConfig) -> Vec<Vec<Line>> {
    let max_gap = config.region_gap_factor * config.median_line_height;
    let mut groups: Vec<Vec<Line>> = Vec::new();
    let mut current: Vec<Line> = Vec::new();
    let mut current_near = false;
    let mut current_rect = Rect::default();

    for line in lines {
        let near = near_obstacle(&line.rect, obstacles, config.obstacle_margin);

        if let Some(prev) = current.last() {
            let gap = prev.rect.y - line.rect.top();
            let breaks = near != current_near
                || gap > max_gap
                || current_rect.horizontal_overlap(&line.rect) <= 0.0;
            if breaks {
                groups.push(std::mem::take(&mut current));
            }
        }

        if current.is_empty() {
            current_near = near;
            current_rect = line.rect;
        } else {
            current_rect = current_rect.union(&line.rect);
        }
        current.push(line);
    }

    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// Split a group around detected grids; the flag marks grid parts.
fn split_grids(lines: Vec<Line>, detector: &TableDetector) -> Vec<(Vec<Line>, bool)> {
    let grids = detector.detect(&lines);
    if grids.is_empty() {
        return vec![(lines, false)];
    }

    let mut parts = Vec::new();
    let mut rest = lines;
    let mut consumed = 0;

    for grid in grids {
        let before: Vec<Line> = rest.drain(..grid.first_line - consumed).collect();
        let rows: Vec<Line> = rest.drain(..grid.row_count()).collect();
        consumed = grid.last_line + 1;
        if !before.is_empty() {
            parts.push((before, false));
        }
        parts.push((rows, true));
    }
    if !rest.is_empty() {
        parts.push((rest, false));
    }
    parts
}

fn build_region(
    index: usize,
    lines: Vec<Line>,
    table_like: bool,
    obstacles: &[Obstacle],
    config: &RegionConfig,
) -> Region {
    let rect = lines
        .iter()
        .map(|l| l.rect)
        .reduce(|a, b| a.union(&b))
        .unwrap_or_default();

    let overlaps_obstacle = near_obstacle(&rect, obstacles, config.obstacle_margin);
    let nearest_obstacle_distance = obstacles
        .iter()
        .map(|o| rect.distance_to(&o.rect))
        .reduce(f64::min);
    let zone = rect.expand(config.obstacle_margin);
    let border_count = obstacles
        .iter()
        .filter(|o| o.is_border_like() && zone.intersects(&o.rect))
        .count();

    let mut blockers = Vec::new();
    if overlaps_obstacle {
        blockers.push(FlowBlocker::Obstacle);
    }
    if table_like || border_count >= BORDER_GRID_COUNT {
        blockers.push(FlowBlocker::TableLike);
    }
    if has_overlapping_lines(&lines) {
        blockers.push(FlowBlocker::OverlappingLines);
    }
    if lines.iter().any(|l| l.has_rotation) {
        blockers.push(FlowBlocker::RotatedText);
    }

    if !blockers.is_empty() {
        log::debug!("region {index}: flow denied by {:?}", blockers);
    }

    Region {
        index,
        rect,
        lines,
        paragraphs: Vec::new(),
        flow_allowed: blockers.is_empty(),
        overlaps_obstacle,
        nearest_obstacle_distance,
        border_count,
        blockers,
    }
}
