//! In-memory box tree produced by the renderers.
//!
//! Renderers build [`Element`] trees; the layout adapter transforms trees;
//! markup is produced only by [`Element::to_html`].

use std::fmt::Write;

/// Role attribute marking elements the layout adapter must recognize.
pub const ROLE_ATTR: &str = "data-role";

/// A positioned text run.
pub const ROLE_RUN: &str = "run";
/// A wrapper grouping the runs of one line.
pub const ROLE_LINE: &str = "line";
/// A zero-content spacer.
pub const ROLE_SPACER: &str = "spacer";
/// A container whose children are absolutely positioned.
pub const ROLE_ABSOLUTE: &str = "absolute";

/// A node of the box tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Element with children
    Element(Element),
    /// Text content (escaped on output)
    Text(String),
}

impl Node {
    /// Element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An element with classes, inline styles, attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name
    pub tag: String,
    /// CSS classes in order
    pub classes: Vec<String>,
    /// Inline style declarations in insertion order
    pub styles: Vec<(String, String)>,
    /// Other attributes in insertion order
    pub attrs: Vec<(String, String)>,
    /// Children
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            styles: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an inline style declaration.
    pub fn with_style(mut self, property: &str, value: impl Into<String>) -> Self {
        self.set_style(property, value);
        self
    }

    /// Set an attribute.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Mark the element with a role.
    pub fn with_role(self, role: &str) -> Self {
        self.with_attr(ROLE_ATTR, role)
    }

    /// Add a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Add a text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append text, extending a trailing text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.children.last_mut() {
            Some(Node::Text(existing)) => existing.push_str(&text),
            _ => self.children.push(Node::Text(text)),
        }
    }

    /// Set or replace an inline style declaration.
    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        match self.styles.iter_mut().find(|(p, _)| p == property) {
            Some(entry) => entry.1 = value,
            None => self.styles.push((property.to_string(), value)),
        }
    }

    /// Remove an inline style declaration.
    pub fn remove_style(&mut self, property: &str) {
        self.styles.retain(|(p, _)| p != property);
    }

    /// Value of an inline style declaration.
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Pixel value of an inline style declaration (`"12.5px"` → 12.5).
    pub fn px(&self, property: &str) -> Option<f64> {
        self.style(property)?.trim().strip_suffix("px")?.trim().parse().ok()
    }

    /// Set or replace an attribute.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the element carries the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.attr(ROLE_ATTR) == Some(role)
    }

    /// Child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Serialize the tree to markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => collect_text(child, out),
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    if !el.classes.is_empty() {
        let _ = write!(
            out,
            " class=\"{}\"",
            html_escape::encode_double_quoted_attribute(&el.classes.join(" "))
        );
    }
    if !el.styles.is_empty() {
        let style: String = el.styles.iter().map(|(p, v)| format!("{p}:{v};")).collect();
        let _ = write!(
            out,
            " style=\"{}\"",
            html_escape::encode_double_quoted_attribute(&style)
        );
    }
    for (name, value) in &el.attrs {
        let _ = write!(
            out,
            " {}=\"{}\"",
            name,
            html_escape::encode_double_quoted_attribute(value)
        );
    }
    out.push('>');
    for child in &el.children {
        match child {
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Node::Element(child) => write_element(child, out),
        }
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}
