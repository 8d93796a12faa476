//! Outline/flow strategy: classified blocks as reflowable block elements.

use crate::model::{fmt_px, round3, Block, BlockKind, LineToken, ListItem, RunStyle};

use super::context::RenderContext;
use super::dom::Element;

/// Render the blocks of one flow-eligible region.
pub fn render_flow_region(index: usize, blocks: &[Block], ctx: &mut RenderContext) -> Element {
    let mut section = Element::new("section")
        .with_class("region")
        .with_class("region-flow")
        .with_attr("data-region", index.to_string());
    for block in blocks {
        section.push(render_block(block, ctx));
    }
    section
}

/// Render one block as `h1..h6`, `p`, or `ul`/`ol` with `li` items.
///
/// `margin-top` carries the gap before the block, `padding-left` the
/// smallest line indent, `text-indent` the first-line offset from it.
pub fn render_block(block: &Block, ctx: &mut RenderContext) -> Element {
    let tag = match &block.kind {
        BlockKind::Heading { level } => format!("h{}", (*level).clamp(1, 6)),
        BlockKind::List { list_type, .. } => list_type.tag().to_string(),
        BlockKind::Paragraph => "p".to_string(),
    };

    let mut el = Element::new(tag)
        .with_class(ctx.class_for(&block.dominant))
        .with_style("margin-top", fmt_px(block.gap_before.max(0.0)))
        .with_style("margin-bottom", "0");
    if block.indent > 0.0 {
        el.set_style("padding-left", fmt_px(block.indent));
    }
    let text_indent = round3(block.first_line_indent - block.indent);
    if text_indent != 0.0 && !block.is_list() {
        el.set_style("text-indent", fmt_px(text_indent));
    }
    if block.line_height > 0.0 {
        el.set_style("line-height", fmt_px(block.line_height));
    }

    match &block.kind {
        BlockKind::List { items, .. } => {
            for item in items {
                el.push(render_item(item, &block.dominant, ctx));
            }
        }
        _ => push_tokens(&mut el, &block.content, &block.dominant, ctx),
    }
    el
}

fn render_item(item: &ListItem, dominant: &RunStyle, ctx: &mut RenderContext) -> Element {
    let mut li = Element::new("li");
    push_tokens(&mut li, trimmed(&item.content), dominant, ctx);
    li
}

/// Append inline content; runs differing from the block style get their own span.
pub fn push_tokens(el: &mut Element, tokens: &[LineToken], dominant: &RunStyle, ctx: &mut RenderContext) {
    for token in trimmed(tokens) {
        match token {
            LineToken::Space => el.push_text(" "),
            LineToken::Text { text, style } if style.matches(dominant) => el.push_text(text.clone()),
            LineToken::Text { text, style } => {
                el.push(Element::new("span").with_class(ctx.class_for(style)).with_text(text.clone()))
            }
        }
    }
}

/// Tokens without leading and trailing space tokens.
fn trimmed(tokens: &[LineToken]) -> &[LineToken] {
    let start = tokens
        .iter()
        .position(|t| !matches!(t, LineToken::Space))
        .unwrap_or(tokens.len());
    let end = tokens
        .iter()
        .rposition(|t| !matches!(t, LineToken::Space))
        .map(|i| i + 1)
        .unwrap_or(start);
    &tokens[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListKind, Rect};

    fn text(s: &str, style: &RunStyle) -> LineToken {
        LineToken::Text {
            text: s.to_string(),
            style: style.clone(),
        }
    }

    fn block(kind: BlockKind, content: Vec<LineToken>) -> Block {
        Block {
            kind,
            content,
            dominant: RunStyle::default(),
            rect: Rect::default(),
            gap_before: 6.0,
            indent: 10.0,
            first_line_indent: 30.0,
            line_height: 14.4,
            lines: Vec::new(),
        }
    }

    #[test]
    fn test_paragraph_box_model() {
        let body = RunStyle::default();
        let bold = RunStyle {
            font_weight: 700,
            ..RunStyle::default()
        };
        let b = block(
            BlockKind::Paragraph,
            vec![text("Pay", &body), LineToken::Space, text("now", &bold), LineToken::Space],
        );
        let mut ctx = RenderContext::new();
        let el = render_block(&b, &mut ctx);

        assert_eq!(el.tag, "p");
        assert_eq!(el.px("margin-top"), Some(6.0));
        assert_eq!(el.px("padding-left"), Some(10.0));
        assert_eq!(el.px("text-indent"), Some(20.0));
        assert_eq!(el.text_content(), "Pay now");
        assert_eq!(el.child_elements().count(), 1);
    }

    #[test]
    fn test_heading_and_list_tags() {
        let style = RunStyle::default();
        let mut ctx = RenderContext::new();

        let heading = render_block(&block(BlockKind::Heading { level: 3 }, vec![text("TOTAL DUE", &style)]), &mut ctx);
        assert_eq!(heading.tag, "h3");

        let list = block(
            BlockKind::List {
                list_type: ListKind::Unordered,
                items: vec![
                    ListItem::new(vec![text("Apples", &style)]),
                    ListItem::new(vec![LineToken::Space, text("Bananas", &style)]),
                ],
            },
            Vec::new(),
        );
        let el = render_block(&list, &mut ctx);
        assert_eq!(el.tag, "ul");
        assert_eq!(el.style("text-indent"), None);
        let items: Vec<String> = el.child_elements().map(Element::text_content).collect();
        assert_eq!(items, vec!["Apples", "Bananas"]);
    }
}
