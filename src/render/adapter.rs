//! Layout adapter: rebuilds absolutely positioned containers as flex rows.
//!
//! Runs inside every container marked [`ROLE_ABSOLUTE`] are collected with
//! their accumulated offsets, clustered into rows by vertical proximity,
//! sorted left to right and re-emitted as a flex column of flex rows.
//! Horizontal and (optionally) vertical gaps become empty spacer elements.

use crate::model::fmt_px;

use super::dom::{Element, Node, ROLE_ABSOLUTE, ROLE_LINE, ROLE_RUN, ROLE_SPACER};
use super::LayoutAdapterConfig;

/// A positioned item lifted out of an absolute container.
#[derive(Debug, Clone)]
struct Item {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    element: Element,
}

impl Item {
    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Apply the adapter to a tree in place. Does nothing unless the mode is `flex`.
pub fn adapt(root: &mut Element, config: &LayoutAdapterConfig) {
    if !config.is_enabled() {
        return;
    }
    if root.has_role(ROLE_ABSOLUTE) {
        rebuild(root, config);
        return;
    }
    for child in root.children.iter_mut() {
        if let Node::Element(el) = child {
            adapt(el, config);
        }
    }
}

fn rebuild(container: &mut Element, config: &LayoutAdapterConfig) {
    let children = std::mem::take(&mut container.children);
    let mut items = Vec::new();
    let mut others = Vec::new();
    collect(children, 0.0, 0.0, &mut items, &mut others);

    if items.is_empty() {
        container.children = others;
        return;
    }

    let rows = cluster_rows(items, config.row_threshold_px);
    log::trace!("layout adapter: {} row(s)", rows.len());

    let mut column = Element::new("div")
        .with_class("flex-column")
        .with_style("display", "flex")
        .with_style("flex-direction", "column");

    let mut prev_bottom = 0.0_f64;
    for row in rows {
        let row_top = row.iter().map(|i| i.top).fold(f64::INFINITY, f64::min);
        let row_bottom = row.iter().map(Item::bottom).fold(f64::NEG_INFINITY, f64::max);
        let gap = row_top - prev_bottom;
        if config.preserve_vertical_gaps && gap >= config.min_gap_px {
            column.push(spacer("div").with_style("height", fmt_px(gap)));
        }
        column.push(build_row(row, config.min_gap_px));
        prev_bottom = prev_bottom.max(row_bottom);
    }

    container.children = vec![Node::Element(column)];
    container.children.extend(others);
}

fn collect(children: Vec<Node>, dx: f64, dy: f64, items: &mut Vec<Item>, others: &mut Vec<Node>) {
    for child in children {
        let el = match child {
            Node::Element(el) => el,
            text @ Node::Text(_) => {
                others.push(text);
                continue;
            }
        };

        if el.has_role(ROLE_SPACER) {
            continue;
        }

        let left = dx + el.px("left").unwrap_or(0.0);
        let top = dy + el.px("top").unwrap_or(0.0);
        let positioned_children = el
            .child_elements()
            .any(|c| c.style("position") == Some("absolute"));

        if el.has_role(ROLE_LINE) && positioned_children {
            collect(el.children, left, top, items, others);
        } else if (el.has_role(ROLE_RUN) || el.has_role(ROLE_LINE)) && el.style("position") == Some("absolute") {
            items.push(lift(el, left, top));
        } else {
            others.push(Node::Element(el));
        }
    }
}

fn lift(mut element: Element, left: f64, top: f64) -> Item {
    element.remove_style("position");
    element.remove_style("left");
    element.remove_style("top");
    element.set_style("flex", "0 0 auto");
    let width = element.px("width").unwrap_or(0.0);
    let height = element
        .px("height")
        .or_else(|| element.px("line-height"))
        .unwrap_or(0.0);
    Item {
        left,
        top,
        width,
        height,
        element,
    }
}

fn cluster_rows(mut items: Vec<Item>, threshold: f64) -> Vec<Vec<Item>> {
    items.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.left.total_cmp(&b.left)));

    let mut rows: Vec<Vec<Item>> = Vec::new();
    for item in items {
        match rows.last_mut() {
            Some(row) if (item.top - row[0].top).abs() <= threshold => row.push(item),
            _ => rows.push(vec![item]),
        }
    }
    for row in rows.iter_mut() {
        row.sort_by(|a, b| a.left.total_cmp(&b.left));
    }
    rows
}

fn build_row(row: Vec<Item>, min_gap: f64) -> Element {
    let mut el = Element::new("div")
        .with_class("flex-row")
        .with_style("display", "flex")
        .with_style("flex-direction", "row")
        .with_style("align-items", "flex-start");

    let mut cursor = 0.0_f64;
    for item in row {
        let gap = item.left - cursor;
        if gap >= min_gap {
            el.push(
                spacer("span")
                    .with_style("flex", "0 0 auto")
                    .with_style("width", fmt_px(gap)),
            );
        }
        cursor = cursor.max(item.left + item.width);
        el.push(item.element);
    }
    el
}

fn spacer(tag: &str) -> Element {
    Element::new(tag).with_role(ROLE_SPACER).with_style("display", "block")
}
