//! Lexical enhancer: conservative word-boundary repair of merged run text.
//!
//! Every step only inserts spaces. A step whose output differs from its
//! input in anything other than whitespace is discarded, and low-confidence
//! suggestions leave the text unchanged.

pub mod en;
pub mod fixups;
pub mod model;
pub mod segment;

pub use fixups::apply_fixups;
pub use model::LexicalModel;
pub use segment::{segment, suggest_splits, SegmentConfig, SplitSuggestion};

use crate::model::{Line, PageLayout};

/// Candidate selection thresholds.
#[derive(Debug, Clone)]
pub struct LexicalConfig {
    /// Minimum run length (characters) considered for segmentation
    pub min_run_length: usize,
    /// Minimum share of letters in a candidate run
    pub min_letter_ratio: f64,
    /// Maximum share of whitespace in a candidate run
    pub max_space_ratio: f64,
    /// Boundary suggester thresholds
    pub segment: SegmentConfig,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            min_run_length: 8,
            min_letter_ratio: 0.65,
            max_space_ratio: 0.1,
            segment: SegmentConfig::default(),
        }
    }
}

/// Dictionary/bigram based boundary correction for one classifier profile.
#[derive(Debug, Clone)]
pub struct LexicalEnhancer {
    model: Option<&'static LexicalModel>,
    config: LexicalConfig,
}

impl LexicalEnhancer {
    /// Create an enhancer for a classifier profile (`"en"`, `"none"`).
    pub fn for_profile(profile: &str) -> Self {
        let model = LexicalModel::for_profile(profile);
        if model.is_none() && !profile.trim().eq_ignore_ascii_case("none") {
            log::warn!("unknown text classifier profile {profile:?}, lexical correction disabled");
        }
        Self {
            model,
            config: LexicalConfig::default(),
        }
    }

    /// Builder-style configuration.
    pub fn with_config(mut self, config: LexicalConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether a dictionary is loaded.
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Repair run text in every line and paragraph of an analyzed page.
    pub fn enhance_layout(&self, layout: &mut PageLayout) {
        if !self.has_model() {
            log::trace!("page {}: fixups only", layout.number);
        }
        for region in layout.regions.iter_mut() {
            for line in region.lines.iter_mut() {
                self.enhance_line(line);
            }
            for paragraph in region.paragraphs.iter_mut() {
                for pl in paragraph.lines.iter_mut() {
                    self.enhance_line(&mut pl.line);
                }
            }
        }
    }

    fn enhance_line(&self, line: &mut Line) {
        for run in line.runs.iter_mut() {
            run.text = self.enhance_text(&run.text);
        }
    }

    /// Repair word boundaries in one run's text.
    pub fn enhance_text(&self, text: &str) -> String {
        let segmented = guarded(text, self.split_boundaries(text));
        guarded(&segmented, apply_fixups(&segmented, self.model))
    }

    fn split_boundaries(&self, text: &str) -> String {
        let Some(model) = self.model else {
            return text.to_string();
        };
        if !self.is_candidate(text) {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len() + 8);
        let mut letters = String::new();
        for c in text.chars() {
            if c.is_alphabetic() {
                letters.push(c);
                continue;
            }
            self.push_segmented(model, &letters, &mut out);
            letters.clear();
            out.push(c);
        }
        self.push_segmented(model, &letters, &mut out);
        out
    }

    fn push_segmented(&self, model: &LexicalModel, letters: &str, out: &mut String) {
        if letters.chars().count() < self.config.min_run_length {
            out.push_str(letters);
            return;
        }
        let splits = suggest_splits(model, letters, &self.config.segment);
        let mut next = splits.iter().map(|s| s.offset).peekable();
        for (i, c) in letters.chars().enumerate() {
            if next.peek() == Some(&i) {
                out.push(' ');
                next.next();
            }
            out.push(c);
        }
    }

    fn is_candidate(&self, text: &str) -> bool {
        let total = text.chars().count();
        if total < self.config.min_run_length {
            return false;
        }
        let letters = text.chars().filter(|c| c.is_alphabetic()).count();
        let spaces = text.chars().filter(|c| c.is_whitespace()).count();
        letters as f64 / total as f64 >= self.config.min_letter_ratio
            && spaces as f64 / total as f64 <= self.config.max_space_ratio
    }
}

/// Accept `candidate` only if it keeps every non-whitespace character of `original`.
fn guarded(original: &str, candidate: String) -> String {
    let visible = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    if visible(original) == visible(&candidate) {
        candidate
    } else {
        log::debug!("lexical step rejected for {:?}", original);
        original.to_string()
    }
}
