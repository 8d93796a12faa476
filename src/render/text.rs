//! Reading-order plain text extraction.

use crate::model::{PageLayout, Region};

/// Longest line (in characters) treated as a fragment for continuation merging.
pub const SHORT_FRAGMENT_CHARS: usize = 40;

/// Plain text of a page in reading order.
///
/// Flow-eligible regions contribute their paragraph text; other regions
/// contribute their lines in geometric order, with short capitalized
/// fragments joined to a following lowercase line.
pub fn page_text(layout: &PageLayout) -> String {
    layout
        .regions
        .iter()
        .map(region_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Plain text of one region.
pub fn region_text(region: &Region) -> String {
    if region.flow_allowed && !region.paragraphs.is_empty() {
        return region
            .paragraphs
            .iter()
            .map(|p| p.text().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
    }
    merge_continuations(region.lines.iter().map(|l| l.text()))
}

/// Join geometrically ordered lines, merging a short capitalized fragment
/// with a following lowercase-starting line when no terminal punctuation
/// intervenes.
pub fn merge_continuations<I>(lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for line in lines {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(prev) if continues(prev, &line) => {
                prev.push(' ');
                prev.push_str(&line);
            }
            _ => out.push(line),
        }
    }
    out.join("\n")
}

fn continues(prev: &str, next: &str) -> bool {
    let short = prev.chars().count() <= SHORT_FRAGMENT_CHARS;
    let capitalized = prev.chars().next().is_some_and(char::is_uppercase);
    let open = !prev.ends_with(['.', '!', '?', ':', ';']);
    let lowercase_next = next.chars().next().is_some_and(char::is_lowercase);
    short && capitalized && open && lowercase_next
}
