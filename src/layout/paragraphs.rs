//! Paragraph grouping inside flow-eligible regions.

use crate::model::{median, JoinKind, Line, Paragraph, ParagraphLine, Region, RunStyle};

/// A returning first-line indent may be up to this many em deep.
const FIRST_LINE_INDENT_EM: f64 = 4.0;

/// Relative font-size change that always starts a new paragraph.
const FONT_CHANGE_RATIO: f64 = 0.15;

/// Paragraph grouping configuration.
#[derive(Debug, Clone)]
pub struct ParagraphConfig {
    /// Maximum baseline delta, in median line heights, inside a paragraph
    pub block_gap_factor: f64,
    /// Maximum indent delta, in font sizes, inside a paragraph
    pub paragraph_indent_factor: f64,
    /// Document median line height
    pub median_line_height: f64,
}

impl Default for ParagraphConfig {
    fn default() -> Self {
        Self {
            block_gap_factor: 1.8,
            paragraph_indent_factor: 1.0,
            median_line_height: 14.4,
        }
    }
}

/// Group the lines of a region into paragraphs.
pub fn group_paragraphs(region: &Region, config: &ParagraphConfig) -> Vec<Paragraph> {
    let left = region.rect.x;
    let mut groups: Vec<Vec<ParagraphLine>> = Vec::new();
    let mut current: Vec<ParagraphLine> = Vec::new();

    for line in region.lines.iter().filter(|l| !l.is_blank()) {
        let indent = (line.x() - left).max(0.0);

        if let Some(prev) = current.last() {
            if !continues_paragraph(prev, line, indent, current.len(), config) {
                groups.push(std::mem::take(&mut current));
            }
        }

        let join_with_prev = match current.last() {
            Some(prev) => join_kind(&prev.line.text(), &line.text()),
            None => JoinKind::None,
        };
        current.push(ParagraphLine {
            line: line.clone(),
            indent,
            join_with_prev,
        });
    }
    if !current.is_empty() {
        groups.push(current);
    }

    let mut paragraphs: Vec<Paragraph> = Vec::with_capacity(groups.len());
    for lines in groups {
        let rect = lines
            .iter()
            .map(|pl| pl.line.rect)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        let gap_before = paragraphs
            .last()
            .map(|p: &Paragraph| (p.rect.y - rect.top()).max(0.0))
            .unwrap_or(0.0);
        let pitches: Vec<f64> = lines
            .windows(2)
            .map(|w| w[0].line.baseline - w[1].line.baseline)
            .filter(|d| *d > 0.0)
            .collect();
        let line_height = median(&pitches).unwrap_or(config.median_line_height);

        paragraphs.push(Paragraph {
            dominant: dominant_style(&lines),
            lines,
            line_height,
            gap_before,
            rect,
        });
    }

    log::trace!(
        "region {}: {} line(s) grouped into {} paragraph(s)",
        region.index,
        region.lines.len(),
        paragraphs.len()
    );
    paragraphs
}

fn continues_paragraph(
    prev: &ParagraphLine,
    line: &Line,
    indent: f64,
    lines_so_far: usize,
    config: &ParagraphConfig,
) -> bool {
    let prev_fs = prev.line.avg_font_size;
    let fs = prev_fs.max(line.avg_font_size);

    let delta = prev.line.baseline - line.baseline;
    if delta <= 0.0 || delta > config.block_gap_factor * config.median_line_height {
        return false;
    }

    if (prev_fs - line.avg_font_size).abs() > (FONT_CHANGE_RATIO * fs).max(1.0) {
        return false;
    }

    let indent_delta = indent - prev.indent;
    let max_delta = config.paragraph_indent_factor * fs;

    // A deeper indent after a finished sentence opens a new paragraph
    if indent_delta > 0.5 * fs && ends_sentence(&prev.line.text()) {
        return false;
    }
    if indent_delta.abs() <= max_delta {
        return true;
    }
    // Return from an indented first line
    lines_so_far == 1 && indent_delta < 0.0 && -indent_delta <= FIRST_LINE_INDENT_EM * fs
}

fn ends_sentence(text: &str) -> bool {
    text.trim_end()
        .chars()
        .last()
        .map(|c| matches!(c, '.' | '!' | '?' | ':'))
        .unwrap_or(false)
}

/// How `next` attaches to `prev`.
///
/// A soft hyphen always marks hyphenation. A hard hyphen after a letter does
/// when the next line starts lowercase; the hyphen itself is kept. Without
/// terminal punctuation, a lowercase start continues the sentence.
pub fn join_kind(prev: &str, next: &str) -> JoinKind {
    let prev = prev.trim_end();
    let Some(first) = next.trim_start().chars().next() else {
        return JoinKind::None;
    };
    let mut tail = prev.chars().rev();
    let Some(last) = tail.next() else {
        return JoinKind::None;
    };

    if last == '\u{00AD}' {
        return JoinKind::Hyphenation;
    }
    if last == '-' {
        let before = tail.next();
        if before.map(char::is_alphabetic).unwrap_or(false) && first.is_lowercase() {
            return JoinKind::Hyphenation;
        }
    }
    if !matches!(last, '.' | '!' | '?' | ':' | ';') && first.is_lowercase() {
        return JoinKind::Continuation;
    }
    JoinKind::None
}

/// The style covering the most characters.
fn dominant_style(lines: &[ParagraphLine]) -> RunStyle {
    let mut tally: Vec<(RunStyle, usize)> = Vec::new();
    for run in lines.iter().flat_map(|pl| pl.line.runs.iter()) {
        let chars = run.text.chars().filter(|c| !c.is_whitespace()).count();
        match tally.iter_mut().find(|(style, _)| style.matches(&run.style)) {
            Some((_, count)) => *count += chars,
            None => tally.push((run.style.clone(), chars)),
        }
    }
    tally
        .into_iter()
        .reduce(|best, cand| if cand.1 > best.1 { cand } else { best })
        .map(|(style, _)| style)
        .unwrap_or_default()
}
