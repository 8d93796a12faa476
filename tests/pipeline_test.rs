//! End-to-end scenarios from glyphs to markup.

use unpdf_html::classify::{ClassifierConfig, SemanticClassifier};
use unpdf_html::layout::{merge_glyphs, MergeConfig};
use unpdf_html::model::ListKind;
use unpdf_html::{
    BlockKind, Converter, DocumentStats, GlyphRun, Obstacle, PageInput, Rect, RenderOptions,
    TextLayout, TextPipeline, WordGapModel,
};

fn glyph(text: &str, x: f64, y: f64, width: f64, size: f64) -> GlyphRun {
    GlyphRun::new(text, x, y, width, size, "Helvetica")
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn flow() -> Converter {
    init_logging();
    Converter::new(RenderOptions::new().with_text_layout(TextLayout::Flow)).unwrap()
}

#[test]
fn test_scenario_a_glyphs_merge_into_word() {
    let glyphs = vec![
        glyph("H", 0.0, 700.0, 6.0, 12.0),
        glyph("e", 6.0, 700.0, 5.0, 12.0),
        glyph("l", 11.0, 700.0, 4.0, 12.0),
        glyph("l", 15.0, 700.0, 4.0, 12.0),
        glyph("o", 19.0, 700.0, 6.0, 12.0),
    ];
    let runs = merge_glyphs(&glyphs, &WordGapModel::default(), &MergeConfig::default());
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "Hello");

    let page = PageInput::letter(1).with_glyphs(glyphs);
    let output = flow().convert(&[page]).unwrap();
    assert_eq!(output.pages[0].text.as_deref(), Some("Hello"));
}

#[test]
fn test_scenario_b_word_gap_inserts_space() {
    let page = PageInput::letter(1).with_glyphs(vec![
        glyph("Hello", 70.0, 700.0, 30.0, 12.0),
        glyph("World", 130.0, 700.0, 30.0, 12.0),
    ]);

    for layout in [TextLayout::Absolute, TextLayout::Flow, TextLayout::Semantic, TextLayout::Smart] {
        let converter = Converter::new(RenderOptions::new().with_text_layout(layout)).unwrap();
        let output = converter.convert(std::slice::from_ref(&page)).unwrap();
        assert_eq!(output.pages[0].text.as_deref(), Some("Hello World"), "{layout:?}");
    }

    let output = flow().convert(&[page]).unwrap();
    assert!(output.pages[0].markup.contains("Hello World"));
}

#[test]
fn test_scenario_c_all_caps_heading() {
    let page = PageInput::letter(1).with_glyphs(vec![
        glyph("TOTAL DUE", 72.0, 720.0, 95.0, 18.0),
        glyph("Please remit the amount shown", 72.0, 690.0, 160.0, 12.0),
        glyph("within thirty days of receipt.", 72.0, 676.0, 160.0, 12.0),
    ]);
    let output = flow().convert(&[page]).unwrap();
    let markup = &output.pages[0].markup;
    assert!(markup.contains("<h3"), "{markup}");
    assert!(markup.contains("TOTAL DUE</h3>"));
    assert!(markup.contains("<p"));
}

#[test]
fn test_scenario_d_bullet_list() {
    let page = PageInput::letter(1).with_glyphs(vec![
        glyph("• Apples", 72.0, 700.0, 45.0, 12.0),
        glyph("• Bananas", 72.0, 686.0, 52.0, 12.0),
    ]);
    let converter = flow();
    let stats = converter.document_stats(std::slice::from_ref(&page));
    let layout = converter.analyze(&page, &stats).unwrap();
    assert_eq!(layout.regions.len(), 1);

    let classifier = SemanticClassifier::new(ClassifierConfig::default(), &stats);
    let blocks = classifier.classify_region(&layout.regions[0]);
    assert_eq!(blocks.len(), 1);
    match &blocks[0].kind {
        BlockKind::List { list_type, .. } => assert_eq!(*list_type, ListKind::Unordered),
        other => panic!("expected list, got {other:?}"),
    }
    assert_eq!(blocks[0].list_items(), vec!["Apples", "Bananas"]);

    let markup = &converter.convert(&[page]).unwrap().pages[0].markup;
    assert!(markup.contains("<ul"));
    assert!(markup.contains("<li>Apples</li><li>Bananas</li>"));
    assert!(!markup.contains('•'));
}

#[test]
fn test_scenario_e_obstacle_forces_positioning() {
    let page = PageInput::letter(1)
        .with_glyphs(vec![
            glyph("Caption text near a picture", 72.0, 700.0, 150.0, 12.0),
            glyph("continues here", 72.0, 686.0, 80.0, 12.0),
        ])
        .with_obstacles(vec![Obstacle::image(Rect::new(60.0, 660.0, 200.0, 60.0))]);

    let output = flow().convert(&[page]).unwrap();
    let out = &output.pages[0];
    let summary = out.layout_summary.unwrap();
    assert_eq!(summary.flow_regions, 0);
    assert_eq!(summary.paragraphs, 0);
    assert!(out.markup.contains("region-fixed"));
    assert!(out.markup.contains("position:absolute"));
    assert!(!out.markup.contains("<p"));
}

#[test]
fn test_smart_layout_mixes_flow_and_positioned_regions() {
    let page = PageInput::letter(1)
        .with_glyphs(vec![
            glyph("An introduction paragraph", 72.0, 720.0, 140.0, 12.0),
            glyph("that wraps onto a second line.", 72.0, 706.0, 160.0, 12.0),
            glyph("Photo caption", 72.0, 400.0, 75.0, 12.0),
        ])
        .with_obstacles(vec![Obstacle::image(Rect::new(60.0, 380.0, 200.0, 40.0))]);

    let converter = Converter::new(RenderOptions::new().with_text_layout(TextLayout::Smart)).unwrap();
    let out = &converter.convert(&[page]).unwrap().pages[0];
    let summary = out.layout_summary.unwrap();
    assert_eq!(summary.regions, 2);
    assert_eq!(summary.flow_regions, 1);
    assert!(out.markup.contains("region-flow"));
    assert!(out.markup.contains("region-fixed"));
    assert!(out.markup.contains("Photo caption"));
}

#[test]
fn test_svg_layer_when_preserving_layout() {
    let page = PageInput::letter(1).with_glyphs(vec![glyph("Invoice", 72.0, 700.0, 45.0, 12.0)]);
    let options = RenderOptions::new().with_preserve_layout(true);
    let markup = &Converter::new(options).unwrap().convert(&[page]).unwrap().pages[0].markup;
    assert!(markup.contains("<svg"));
    assert!(markup.contains("textLength=\"45\""));
    assert!(markup.contains("lengthAdjust=\"spacingAndGlyphs\""));
}

#[test]
fn test_smart_pipeline_repairs_glued_words() {
    let page = PageInput::letter(1).with_glyphs(vec![glyph("paymentisdue", 72.0, 700.0, 70.0, 12.0)]);
    let options = RenderOptions::new()
        .with_text_layout(TextLayout::Flow)
        .with_text_pipeline(TextPipeline::Smart);
    let output = Converter::new(options).unwrap().convert(&[page.clone()]).unwrap();
    assert_eq!(output.pages[0].text.as_deref(), Some("payment is due"));

    let output = flow().convert(&[page]).unwrap();
    assert_eq!(output.pages[0].text.as_deref(), Some("paymentisdue"));
}

#[test]
fn test_document_stats_shared_across_pages() {
    let body = |n| {
        PageInput::letter(n).with_glyphs(vec![glyph("Body text line", 72.0, 700.0, 75.0, 12.0)])
    };
    let pages = vec![body(1), body(2), body(3)];
    let stats = DocumentStats::from_pages(&pages, 0.35);
    assert_eq!(stats.median_font_size, 12.0);

    let converter = flow();
    let output = converter.convert_with_stats(&pages, &stats).unwrap();
    assert_eq!(output.pages.len(), 3);
    assert_eq!(output.text(), "Body text line\n\nBody text line\n\nBody text line");
}

#[test]
fn test_hard_hyphens_kept_across_lines() {
    let page = PageInput::letter(1).with_glyphs(vec![
        glyph("This is a well-", 72.0, 700.0, 80.0, 12.0),
        glyph("known self-", 72.0, 686.0, 60.0, 12.0),
        glyph("contained tool.", 72.0, 672.0, 80.0, 12.0),
    ]);
    let output = flow().convert(&[page]).unwrap();
    let out = &output.pages[0];
    assert_eq!(out.text.as_deref(), Some("This is a well-known self-contained tool."));
    assert!(out.markup.contains("well-known self-contained"), "{}", out.markup);
}

#[test]
fn test_smart_pipeline_keeps_real_words() {
    init_logging();
    let page = PageInput::letter(1)
        .with_glyphs(vec![glyph("Outstanding background checks", 72.0, 700.0, 160.0, 12.0)]);
    let options = RenderOptions::new()
        .with_text_layout(TextLayout::Flow)
        .with_text_pipeline(TextPipeline::Smart);
    let output = Converter::new(options).unwrap().convert(&[page]).unwrap();
    assert_eq!(output.pages[0].text.as_deref(), Some("Outstanding background checks"));
}
