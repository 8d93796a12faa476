//! Per-conversion rendering state.

use std::collections::HashMap;

use crate::model::{fmt_px, RunStyle};

/// Style→class memo table and extra CSS rules for one conversion.
///
/// Created fresh for every document; nothing here outlives the conversion.
#[derive(Debug, Default)]
pub struct RenderContext {
    classes: HashMap<String, String>,
    rules: Vec<(String, String)>,
    extra_css: Vec<String>,
}

impl RenderContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// CSS class for a run style, creating it on first use.
    pub fn class_for(&mut self, style: &RunStyle) -> String {
        let declarations = style_declarations(style);
        if let Some(class) = self.classes.get(&declarations) {
            return class.clone();
        }
        let class = format!("s{}", self.rules.len());
        self.classes.insert(declarations.clone(), class.clone());
        self.rules.push((class.clone(), declarations));
        class
    }

    /// Add a document-level CSS rule (deduplicated).
    pub fn add_rule(&mut self, rule: impl Into<String>) {
        let rule = rule.into();
        if !self.extra_css.contains(&rule) {
            self.extra_css.push(rule);
        }
    }

    /// Number of memoized style classes.
    pub fn class_count(&self) -> usize {
        self.rules.len()
    }

    /// Stylesheet with every style class followed by the extra rules.
    pub fn stylesheet(&self) -> String {
        let mut css = String::new();
        for (class, declarations) in &self.rules {
            css.push_str(&format!(".{class}{{{declarations}}}\n"));
        }
        for rule in &self.extra_css {
            css.push_str(rule);
            css.push('\n');
        }
        css
    }
}

fn style_declarations(style: &RunStyle) -> String {
    let family = if style.font_family.is_empty() {
        "sans-serif".to_string()
    } else {
        format!("\"{}\",sans-serif", style.font_family.replace(['"', '\\'], ""))
    };
    let mut css = format!(
        "font-family:{};font-size:{};font-weight:{};font-style:{};color:{};",
        family,
        fmt_px(style.font_size),
        style.font_weight,
        style.font_style.as_css(),
        style.color
    );
    if let Some(decoration) = style.text_decoration {
        css.push_str(&format!("text-decoration:{};", decoration.as_css()));
    }
    css
}
