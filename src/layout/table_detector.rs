//! Table/form grid detection using text position analysis.
//!
//! Inspired by Camelot's Stream mode: lines whose large horizontal gaps recur
//! at matching x-offsets across consecutive lines form a grid. A grid in a
//! region forces the region onto the fixed-position rendering path, because
//! reflowing its text would destroy the column alignment.

use crate::model::Line;

/// A detected grid: a run of consecutive lines with aligned cell starts.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedGrid {
    /// Index of the first line of the grid
    pub first_line: usize,
    /// Index of the last line of the grid (inclusive)
    pub last_line: usize,
    /// Column start positions (x) shared by the grid's rows
    pub columns: Vec<f64>,
}

impl DetectedGrid {
    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.last_line - self.first_line + 1
    }
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as a grid
    pub min_rows: usize,
    /// Minimum number of cells per row
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Minimum gap between cells (points)
    pub min_column_gap: f64,
    /// Minimum gap between cells relative to the line's font size
    pub min_column_gap_em: f64,
    /// Tolerance for matching cell starts across rows (points)
    pub x_tolerance: f64,
    /// Minimum share of a row's cell starts that must match shared columns
    pub min_alignment_ratio: f64,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 12,
            min_column_gap: 15.0,
            min_column_gap_em: 1.5,
            x_tolerance: 3.0,
            min_alignment_ratio: 0.6,
        }
    }
}

/// Detects table-like grids among a region's lines.
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self {
            config: TableDetectorConfig::default(),
        }
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect grids among lines ordered top to bottom.
    pub fn detect(&self, lines: &[Line]) -> Vec<DetectedGrid> {
        if lines.len() < self.config.min_rows {
            return vec![];
        }

        // Step 1: split every line into cells at large gaps
        let cells: Vec<Vec<CellStart>> = lines.iter().map(|l| self.cell_starts(l)).collect();

        // Step 2: cluster cell starts into candidate columns
        let columns = self.detect_columns(&cells);
        if columns.is_empty() {
            return vec![];
        }
        log::trace!("TableDetector: candidate columns {:?}", columns);

        // Step 3: find runs of consecutive aligned rows
        let mut grids = Vec::new();
        let mut start: Option<usize> = None;

        for i in 0..=cells.len() {
            let aligned = i < cells.len() && self.row_is_aligned(&cells[i], &columns);
            match (aligned, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    let end = i - 1;
                    if end + 1 - s >= self.config.min_rows {
                        if let Some(grid) = self.build_grid(&cells, s, end, &columns) {
                            grids.push(grid);
                        }
                    }
                    start = None;
                }
                _ => {}
            }
        }

        log::debug!("TableDetector: {} grid(s) among {} lines", grids.len(), lines.len());
        grids
    }

    fn cell_starts(&self, line: &Line) -> Vec<CellStart> {
        let mut cells = Vec::new();
        let min_gap = self
            .config
            .min_column_gap
            .max(self.config.min_column_gap_em * line.avg_font_size);

        let mut prev_right: Option<f64> = None;
        for run in line.runs.iter().filter(|r| !r.is_whitespace()) {
            let starts_cell = match prev_right {
                None => true,
                Some(right) => run.x - right >= min_gap,
            };
            if starts_cell {
                cells.push(CellStart {
                    x: run.x,
                    text_len: run.text.trim().chars().count(),
                });
            } else if let Some(last) = cells.last_mut() {
                last.text_len += run.text.trim().chars().count();
            }
            prev_right = Some(run.right());
        }
        cells
    }

    /// Cluster cell starts of multi-cell rows; keep clusters supported by enough rows.
    fn detect_columns(&self, cells: &[Vec<CellStart>]) -> Vec<f64> {
        let mut starts: Vec<f64> = cells
            .iter()
            .filter(|row| row.len() >= self.config.min_columns)
            .flat_map(|row| row.iter().map(|c| c.x))
            .collect();
        starts.sort_by(|a, b| a.total_cmp(b));

        let mut clusters: Vec<(f64, usize)> = Vec::new();
        for x in starts {
            match clusters.last_mut() {
                Some((center, count)) if (x - *center).abs() <= self.config.x_tolerance => {
                    *center = (*center * *count as f64 + x) / (*count as f64 + 1.0);
                    *count += 1;
                }
                _ => clusters.push((x, 1)),
            }
        }

        clusters
            .into_iter()
            .filter(|(_, count)| *count >= self.config.min_rows)
            .map(|(center, _)| center)
            .collect()
    }

    fn row_is_aligned(&self, row: &[CellStart], columns: &[f64]) -> bool {
        if row.len() < self.config.min_columns || row.len() > self.config.max_columns {
            return false;
        }
        let interior = &row[1..];
        let matched = interior
            .iter()
            .filter(|c| columns.iter().any(|col| (c.x - col).abs() <= self.config.x_tolerance))
            .count();
        matched as f64 / interior.len() as f64 >= self.config.min_alignment_ratio
    }

    fn build_grid(
        &self,
        cells: &[Vec<CellStart>],
        first: usize,
        last: usize,
        columns: &[f64],
    ) -> Option<DetectedGrid> {
        let rows = &cells[first..=last];
        if self.is_list_pattern(rows) {
            log::debug!("TableDetector: skipping rows {first}..={last}, detected as list pattern");
            return None;
        }

        let used: Vec<f64> = columns
            .iter()
            .copied()
            .filter(|col| {
                rows.iter().any(|row| {
                    row.iter()
                        .any(|c| (c.x - col).abs() <= self.config.x_tolerance)
                })
            })
            .collect();

        Some(DetectedGrid {
            first_line: first,
            last_line: last,
            columns: used,
        })
    }

    /// Two-column rows whose first cell is always a short marker ("•", "1.",
    /// "a)") are a list with hanging indent, not a table.
    fn is_list_pattern(&self, rows: &[Vec<CellStart>]) -> bool {
        rows.iter().all(|row| row.len() == 2 && row[0].text_len <= 3)
    }
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
struct CellStart {
    x: f64,
    text_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GlyphRun, TextRun};

    fn line(y: f64, cells: &[(&str, f64)]) -> Line {
        let runs: Vec<TextRun> = cells
            .iter()
            .map(|(text, x)| {
                let width = text.chars().count() as f64 * 6.0;
                TextRun::from_glyph(&GlyphRun::new(*text, *x, y, width, 12.0, "Helvetica"))
            })
            .collect();
        let spaces = vec![true; runs.len()];
        Line::new(runs, spaces)
    }

    #[test]
    fn test_detects_aligned_grid() {
        let lines = vec![
            line(700.0, &[("Item", 50.0), ("Qty", 200.0), ("Price", 300.0)]),
            line(685.0, &[("Apples", 50.0), ("3", 201.0), ("1.20", 299.0)]),
            line(670.0, &[("Pears", 50.0), ("12", 200.0), ("0.90", 300.5)]),
        ];
        let grids = TableDetector::new().detect(&lines);
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].row_count(), 3);
        assert_eq!(grids[0].columns.len(), 3);
    }

    #[test]
    fn test_running_text_is_not_a_grid() {
        let lines = vec![
            line(700.0, &[("The", 50.0), ("quick", 72.0), ("brown", 106.0)]),
            line(685.0, &[("fox", 50.0), ("jumps", 72.0), ("over", 110.0)]),
        ];
        assert!(TableDetector::new().detect(&lines).is_empty());
    }

    #[test]
    fn test_hanging_list_is_not_a_grid() {
        let lines = vec![
            line(700.0, &[("•", 50.0), ("First point of the list", 80.0)]),
            line(685.0, &[("•", 50.0), ("Second point", 80.0)]),
        ];
        assert!(TableDetector::new().detect(&lines).is_empty());
    }

    #[test]
    fn test_misaligned_columns_are_not_a_grid() {
        let lines = vec![
            line(700.0, &[("Name", 50.0), ("Value", 200.0)]),
            line(685.0, &[("Other", 50.0), ("Thing", 320.0)]),
        ];
        assert!(TableDetector::new().detect(&lines).is_empty());
    }
}
