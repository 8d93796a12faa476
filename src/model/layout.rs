//! Page layout types: lines, paragraphs and regions.
//!
//! These are recomputed for every page on every render call and carry no
//! identity across calls.

use serde::{Deserialize, Serialize};

use super::{Obstacle, Rect, RunStyle, TextRun};

/// A token of reconstructed line text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineToken {
    /// Text of one run
    Text {
        /// Run text
        text: String,
        /// Run style
        style: RunStyle,
    },
    /// An inter-run word boundary
    Space,
}

impl LineToken {
    /// Plain text of the token.
    pub fn as_str(&self) -> &str {
        match self {
            LineToken::Text { text, .. } => text,
            LineToken::Space => " ",
        }
    }
}

/// Concatenate tokens into plain text.
pub fn tokens_to_text(tokens: &[LineToken]) -> String {
    tokens.iter().map(LineToken::as_str).collect()
}

/// An ordered sequence of runs sharing one baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Runs sorted left to right
    pub runs: Vec<TextRun>,
    /// `space_before[i]`: whether a word boundary precedes `runs[i]`
    pub space_before: Vec<bool>,
    /// Bounding box
    pub rect: Rect,
    /// Baseline of the first run
    pub baseline: f64,
    /// Character-weighted average font size
    pub avg_font_size: f64,
    /// Whether any run is rotated
    pub has_rotation: bool,
}

impl Line {
    /// Build a line from runs and per-run word-boundary flags.
    ///
    /// Runs are sorted by `x`; `space_before` is reordered with them and
    /// padded with `false` if shorter than `runs`.
    pub fn new(runs: Vec<TextRun>, space_before: Vec<bool>) -> Self {
        let mut paired: Vec<(TextRun, bool)> = runs
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                let sp = space_before.get(i).copied().unwrap_or(false);
                (r, sp)
            })
            .collect();
        paired.sort_by(|a, b| a.0.x.total_cmp(&b.0.x));

        let (runs, mut space_before): (Vec<TextRun>, Vec<bool>) = paired.into_iter().unzip();
        if let Some(first) = space_before.first_mut() {
            *first = false;
        }

        let rect = runs
            .iter()
            .map(TextRun::rect)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        let baseline = runs.first().map(|r| r.y).unwrap_or(0.0);

        let total_chars: usize = runs.iter().map(TextRun::char_count).sum();
        let avg_font_size = if total_chars > 0 {
            runs.iter()
                .map(|r| r.font_size() * r.char_count() as f64)
                .sum::<f64>()
                / total_chars as f64
        } else {
            runs.first().map(TextRun::font_size).unwrap_or(0.0)
        };
        let has_rotation = runs.iter().any(|r| r.style.is_rotated());

        Self {
            runs,
            space_before,
            rect,
            baseline,
            avg_font_size,
            has_rotation,
        }
    }

    /// Token stream preserving run boundaries and inter-run spaces.
    pub fn tokens(&self) -> Vec<LineToken> {
        let mut tokens = Vec::with_capacity(self.runs.len() * 2);
        for (i, run) in self.runs.iter().enumerate() {
            if self.space_before.get(i).copied().unwrap_or(false) {
                tokens.push(LineToken::Space);
            }
            tokens.push(LineToken::Text {
                text: run.text.clone(),
                style: run.style.clone(),
            });
        }
        tokens
    }

    /// Plain text of the line.
    pub fn text(&self) -> String {
        tokens_to_text(&self.tokens())
    }

    /// Left edge.
    pub fn x(&self) -> f64 {
        self.rect.x
    }

    /// Tallest run height.
    pub fn line_height(&self) -> f64 {
        self.runs.iter().map(|r| r.height).fold(0.0, f64::max)
    }

    /// Whether the line has no visible text.
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(TextRun::is_whitespace)
    }

    /// The run with the most characters, used as the line's representative style.
    pub fn dominant_run(&self) -> Option<&TextRun> {
        self.runs
            .iter()
            .filter(|r| !r.is_whitespace())
            .max_by_key(|r| r.char_count())
            .or_else(|| self.runs.first())
    }
}

/// How a paragraph line attaches to the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    /// Separate line (first line, or previous line ended a sentence)
    #[default]
    None,
    /// Sentence continues from the previous line
    Continuation,
    /// Previous line ended with a hyphenated word fragment
    Hyphenation,
}

/// A line inside a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphLine {
    /// The line
    pub line: Line,
    /// Offset of the line's left edge from the region's left edge
    pub indent: f64,
    /// Attachment to the previous line
    pub join_with_prev: JoinKind,
}

/// An ordered group of lines within one flow-eligible region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Lines in reading order
    pub lines: Vec<ParagraphLine>,
    /// Style of the most representative run
    pub dominant: RunStyle,
    /// Baseline-to-baseline distance inside the paragraph
    pub line_height: f64,
    /// Vertical gap to the previous paragraph in the region (0 for the first)
    pub gap_before: f64,
    /// Bounding box
    pub rect: Rect,
}

impl Paragraph {
    /// Paragraph text with lines joined according to their join kinds.
    pub fn text(&self) -> String {
        join_lines(self.lines.iter().map(|pl| (pl.line.text(), pl.join_with_prev)))
    }

    /// Token stream of the whole paragraph (see [`join_line_tokens`]).
    pub fn tokens(&self) -> Vec<LineToken> {
        join_line_tokens(&self.lines)
    }

    /// Text of every line, trimmed, in order.
    pub fn line_texts(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|pl| pl.line.text().trim().to_string())
            .collect()
    }

    /// Smallest line indent.
    pub fn min_indent(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| l.indent)
            .reduce(f64::min)
            .unwrap_or(0.0)
            .max(0.0)
    }

    /// Indent of the first line.
    pub fn first_indent(&self) -> f64 {
        self.lines.first().map(|l| l.indent).unwrap_or(0.0)
    }

    /// Dominant font size.
    pub fn font_size(&self) -> f64 {
        self.dominant.font_size
    }
}

/// Token stream of consecutive paragraph lines.
///
/// Lines are separated by a space token, except after hyphenation where
/// they join without one. Only a trailing soft hyphen is removed.
pub fn join_line_tokens(lines: &[ParagraphLine]) -> Vec<LineToken> {
    let mut out: Vec<LineToken> = Vec::new();
    for pl in lines {
        append_line_tokens(&mut out, pl.line.tokens(), pl.join_with_prev);
    }
    out
}

/// Append one line's tokens to a token stream according to its join kind.
pub fn append_line_tokens(out: &mut Vec<LineToken>, tokens: Vec<LineToken>, join: JoinKind) {
    if !out.is_empty() {
        match join {
            JoinKind::Hyphenation => strip_soft_hyphen(out),
            JoinKind::Continuation | JoinKind::None => {
                if !tokens_to_text(out).ends_with(char::is_whitespace) {
                    out.push(LineToken::Space);
                }
            }
        }
    }
    out.extend(tokens);
}

fn strip_soft_hyphen(tokens: &mut Vec<LineToken>) {
    while matches!(tokens.last(), Some(LineToken::Space)) {
        tokens.pop();
    }
    if let Some(LineToken::Text { text, .. }) = tokens.last_mut() {
        let trimmed_len = text.trim_end().len();
        text.truncate(trimmed_len);
        if text.ends_with('\u{00AD}') {
            text.pop();
        }
    }
}

/// Join line texts according to join kinds.
///
/// `Hyphenation` concatenates without a space, dropping a trailing soft
/// hyphen (U+00AD) but keeping a visible `-`; everything else joins with
/// one space.
pub fn join_lines<I>(lines: I) -> String
where
    I: IntoIterator<Item = (String, JoinKind)>,
{
    let mut out = String::new();
    for (i, (text, join)) in lines.into_iter().enumerate() {
        let text = text.trim();
        if i == 0 || out.is_empty() {
            out.push_str(text);
            continue;
        }
        match join {
            JoinKind::Hyphenation => {
                let trimmed_len = out.trim_end().len();
                out.truncate(trimmed_len);
                if out.ends_with('\u{00AD}') {
                    out.pop();
                }
                out.push_str(text);
            }
            JoinKind::Continuation | JoinKind::None => {
                if !out.ends_with(char::is_whitespace) {
                    out.push(' ');
                }
                out.push_str(text);
            }
        }
    }
    out
}

/// Reason a region is denied text flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowBlocker {
    /// Overlaps or sits near an obstacle
    Obstacle,
    /// Lines align like a table or form grid
    TableLike,
    /// Consecutive line boxes overlap vertically
    OverlappingLines,
    /// Contains rotated text
    RotatedText,
}

/// A rectangular page area grouping related lines (and paragraphs, when flow is allowed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Index in page order
    pub index: usize,
    /// Bounding box
    pub rect: Rect,
    /// Lines top to bottom
    pub lines: Vec<Line>,
    /// Paragraphs (empty unless `flow_allowed`)
    pub paragraphs: Vec<Paragraph>,
    /// Whether the text may be rendered as normal block flow
    pub flow_allowed: bool,
    /// Whether the region overlaps or sits near an obstacle
    pub overlaps_obstacle: bool,
    /// Distance to the nearest obstacle (`None` without obstacles)
    pub nearest_obstacle_distance: Option<f64>,
    /// Number of border-like graphics touching the region
    pub border_count: usize,
    /// Reasons flow was denied
    pub blockers: Vec<FlowBlocker>,
}

impl Region {
    /// Plain text of all lines in geometric order.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Layout of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width
    pub width: f64,
    /// Page height
    pub height: f64,
    /// Regions top to bottom
    pub regions: Vec<Region>,
    /// Obstacles reported for the page
    pub obstacles: Vec<Obstacle>,
}

impl PageLayout {
    /// Total number of lines on the page.
    pub fn line_count(&self) -> usize {
        self.regions.iter().map(|r| r.lines.len()).sum()
    }

    /// Number of regions that allow flow.
    pub fn flow_region_count(&self) -> usize {
        self.regions.iter().filter(|r| r.flow_allowed).count()
    }
}
