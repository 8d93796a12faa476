//! Benchmarks for layout analysis and rendering.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic per-character glyph pages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use unpdf_html::lexical::LexicalEnhancer;
use unpdf_html::{Converter, DocumentStats, GlyphRun, LayoutAnalyzer, PageInput, RenderOptions, TextLayout};

const TEXT: &str = "The quick brown fox jumps over the lazy dog while the invoice total remains due";

/// Creates a page of single-character glyphs laid out in running text.
fn create_test_page(number: u32) -> PageInput {
    let mut page = PageInput::letter(number);
    let mut y = 740.0;
    for line in 0..40 {
        let size = if line % 10 == 0 { 16.0 } else { 11.0 };
        let mut x = 50.0;
        for c in TEXT.chars() {
            let w = size * 0.5;
            if c != ' ' {
                page.push_glyph(GlyphRun::new(c.to_string(), x, y, w, size, "Times"));
            }
            x += w;
        }
        y -= size * 1.3;
    }
    page
}

fn create_test_document(page_count: u32) -> Vec<PageInput> {
    (1..=page_count).map(create_test_page).collect()
}

/// Benchmark document statistics.
fn bench_document_stats(c: &mut Criterion) {
    let pages = create_test_document(5);
    c.bench_function("document_stats_5_pages", |b| {
        b.iter(|| DocumentStats::from_pages(black_box(&pages), 0.35));
    });
}

/// Benchmark page analysis.
fn bench_analysis(c: &mut Criterion) {
    let page = create_test_page(1);
    let stats = DocumentStats::from_pages(std::slice::from_ref(&page), 0.35);
    let analyzer = LayoutAnalyzer::new(&stats, Default::default());

    c.bench_function("analyze_page", |b| {
        b.iter(|| analyzer.analyze_page(black_box(&page)).unwrap());
    });
}

/// Benchmark full conversion in every layout mode.
fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");
    let pages = create_test_document(5);

    for layout in [TextLayout::Absolute, TextLayout::Flow, TextLayout::Semantic, TextLayout::Smart] {
        let converter = Converter::new(RenderOptions::new().with_text_layout(layout)).unwrap();
        group.bench_function(format!("{:?}_5_pages", layout).to_lowercase(), |b| {
            b.iter(|| converter.convert(black_box(&pages)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark lexical boundary repair.
fn bench_lexical(c: &mut Criterion) {
    let enhancer = LexicalEnhancer::for_profile("en");
    c.bench_function("lexical_enhance_text", |b| {
        b.iter(|| enhancer.enhance_text(black_box("theinvoicetotalisdueonreceipt")));
    });
}

criterion_group!(
    benches,
    bench_document_stats,
    bench_analysis,
    bench_conversion,
    bench_lexical,
);
criterion_main!(benches);
