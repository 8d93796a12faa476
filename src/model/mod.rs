//! Data model for layout reconstruction.
//!
//! Backend input ([`GlyphRun`], [`PageInput`], [`Obstacle`]) flows through
//! merged [`TextRun`]s into the page layout ([`Line`], [`Region`],
//! [`Paragraph`]) and finally into classified [`Block`]s.

mod block;
mod geometry;
mod glyph;
mod layout;
mod page;
mod run;

pub use block::{Block, BlockKind, ListItem, ListKind};
pub use geometry::{fmt_num, fmt_px, from_html_y, median, percentile, round3, to_html, Rect};
pub use glyph::{
    FontStyle, GlyphRun, RunStyle, TextDecoration, BOLD_WEIGHT_THRESHOLD, DEFAULT_FONT_SIZE,
    DESCENT_RATIO, MAX_FONT_SIZE,
};
pub use layout::{
    append_line_tokens, join_line_tokens, join_lines, tokens_to_text, FlowBlocker, JoinKind, Line, LineToken, PageLayout, Paragraph,
    ParagraphLine, Region,
};
pub use page::{Obstacle, ObstacleKind, PageInput, BORDER_THICKNESS};
pub use run::{TextRun, MIN_PLAUSIBLE_WIDTH_RATIO};
