//! Invariants that hold for any page.

use unpdf_html::layout::{merge_glyphs, merge_text_runs, MergeConfig};
use unpdf_html::model::{from_html_y, to_html};
use unpdf_html::{
    Converter, DocumentStats, GlyphRun, LayoutAnalyzer, Obstacle, ObstacleKind, PageInput, Rect,
    RenderOptions, TextLayout, TextPipeline, WordGapModel,
};

/// Small deterministic generator so page shapes vary without extra dependencies.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (self.next() % 10_000) as f64 / 10_000.0 * (hi - lo)
    }
}

const WORDS: &[&str] = &[
    "invoice", "Total", "due", "payment", "3.14", "e.g.", "Account", "number", "ref-42", "(note)",
];

/// A page of per-character glyphs with jittered kerning and word gaps.
fn synthetic_page(seed: u64, number: u32) -> PageInput {
    build_page(seed, number, false)
}

/// Like [`synthetic_page`], but lines break inside hyphenated words
/// ("co-" / "operate") so paragraphs join across hard hyphens.
fn hyphenated_page(seed: u64, number: u32) -> PageInput {
    build_page(seed, number, true)
}

fn build_page(seed: u64, number: u32, hyphenate: bool) -> PageInput {
    const LINES: usize = 8;
    let mut rng = Lcg(seed);
    let mut page = PageInput::letter(number);
    let mut y = 740.0;
    for line in 0..LINES {
        let size = if !hyphenate && rng.next() % 5 == 0 { 16.0 } else { 11.0 };
        let mut x = 50.0;
        if !hyphenate {
            x += rng.range(0.0, 20.0);
        }

        let mut words: Vec<&str> = Vec::new();
        if hyphenate && line > 0 {
            words.push("operate");
        }
        for _ in 0..(3 + rng.next() % 5) {
            words.push(WORDS[(rng.next() as usize) % WORDS.len()]);
        }
        if hyphenate && line + 1 < LINES {
            words.push("co-");
        }

        for word in words {
            for c in word.chars() {
                let w = size * 0.55;
                page.push_glyph(GlyphRun::new(c.to_string(), x, y, w, size, "Times"));
                x += w + rng.range(-0.3, 0.4);
            }
            x += size * rng.range(0.3, 1.2);
        }
        y -= size * 1.3 + rng.range(0.0, 8.0);
    }
    page
}

fn visible_sorted<'a>(texts: impl Iterator<Item = &'a str>) -> Vec<char> {
    let mut chars: Vec<char> = texts.flat_map(|t| t.chars()).filter(|c| !c.is_whitespace()).collect();
    chars.sort_unstable();
    chars
}

#[test]
fn test_no_character_loss() {
    for seed in 1..=12 {
        let page = synthetic_page(seed, 1);
        let input = visible_sorted(page.glyphs.iter().map(|g| g.text.as_str()));

        for pipeline in [TextPipeline::Legacy, TextPipeline::V2, TextPipeline::Smart] {
            let options = RenderOptions::new()
                .with_text_layout(TextLayout::Semantic)
                .with_text_pipeline(pipeline);
            let converter = Converter::new(options).unwrap();
            let stats = converter.document_stats(std::slice::from_ref(&page));
            let layout = converter.analyze(&page, &stats).unwrap();

            let output = visible_sorted(
                layout
                    .regions
                    .iter()
                    .flat_map(|r| &r.lines)
                    .flat_map(|l| &l.runs)
                    .map(|r| r.text.as_str()),
            );
            assert_eq!(input, output, "seed {seed}, {pipeline:?}");
        }
    }
}

#[test]
fn test_no_character_loss_across_hyphenated_lines() {
    for seed in 1..=12 {
        let page = hyphenated_page(seed, 1);
        let input = visible_sorted(page.glyphs.iter().map(|g| g.text.as_str()));

        for pipeline in [TextPipeline::V2, TextPipeline::Smart] {
            let options = RenderOptions::new()
                .with_text_layout(TextLayout::Flow)
                .with_text_pipeline(pipeline);
            let converter = Converter::new(options).unwrap();
            let stats = converter.document_stats(std::slice::from_ref(&page));
            let layout = converter.analyze(&page, &stats).unwrap();

            let paragraphs: Vec<String> = layout
                .regions
                .iter()
                .flat_map(|r| &r.paragraphs)
                .map(|p| p.text())
                .collect();
            if !paragraphs.is_empty() {
                assert!(paragraphs.iter().any(|p| p.contains("co-operate")), "seed {seed}");
            }

            let output = converter.convert(std::slice::from_ref(&page)).unwrap();
            let text = output.pages[0].text.clone().unwrap_or_default();
            assert_eq!(
                input,
                visible_sorted(std::iter::once(text.as_str())),
                "seed {seed}, {pipeline:?}"
            );
        }
    }
}

#[test]
fn test_merge_idempotence() {
    for seed in 1..=12 {
        let page = synthetic_page(seed, 1);
        let stats = DocumentStats::from_pages(std::slice::from_ref(&page), 0.35);
        let config = MergeConfig::default();
        let once = merge_glyphs(&page.glyphs, &stats.word_gaps, &config);
        let twice = merge_text_runs(once.clone(), &stats.word_gaps, &config);
        assert_eq!(once, twice, "seed {seed}");
    }

    let model = WordGapModel::default();
    let empty = merge_text_runs(Vec::new(), &model, &MergeConfig::default());
    assert!(empty.is_empty());
}

#[test]
fn test_coordinate_round_trip() {
    let mut rng = Lcg(99);
    for _ in 0..500 {
        let page_height = rng.range(100.0, 2000.0);
        let x = rng.range(0.0, 800.0);
        let y = rng.range(-50.0, page_height);
        let h = rng.range(0.5, 80.0);
        let (hx, hy) = to_html(page_height, x, y, h);
        assert_eq!(hx, x);
        assert!((from_html_y(page_height, hy, h) - y).abs() < 1e-6);
    }
}

#[test]
fn test_obstacle_implies_no_flow() {
    for seed in 1..=12 {
        let mut rng = Lcg(seed * 7);
        let mut page = synthetic_page(seed, 1);
        for _ in 0..3 {
            let kind = match rng.next() % 3 {
                0 => ObstacleKind::Image,
                1 => ObstacleKind::Vector,
                _ => ObstacleKind::FormField,
            };
            let rect = Rect::new(rng.range(0.0, 400.0), rng.range(550.0, 750.0), rng.range(5.0, 200.0), rng.range(5.0, 80.0));
            page.push_obstacle(Obstacle::new(kind, rect));
        }

        let stats = DocumentStats::from_pages(std::slice::from_ref(&page), 0.35);
        let analyzer = LayoutAnalyzer::new(&stats, Default::default());
        let layout = analyzer.analyze_page(&page).unwrap();
        for region in &layout.regions {
            if region.overlaps_obstacle {
                assert!(!region.flow_allowed, "seed {seed}, region {}", region.index);
                assert!(region.paragraphs.is_empty());
            }
        }
    }
}

#[test]
fn test_determinism() {
    let pages: Vec<PageInput> = (1..=3).map(|n| synthetic_page(n as u64 * 31, n)).collect();
    for layout in [TextLayout::Absolute, TextLayout::Flow, TextLayout::Semantic, TextLayout::Smart] {
        let converter = Converter::new(RenderOptions::new().with_text_layout(layout)).unwrap();
        let first = converter.convert(&pages).unwrap();
        let second = converter.convert(&pages).unwrap();
        assert_eq!(first.to_html(), second.to_html(), "{layout:?}");
        assert_eq!(first.text(), second.text());
    }
}

#[test]
fn test_broken_glyph_geometry_is_repaired() {
    let page = PageInput::letter(1).with_glyphs(vec![
        GlyphRun::new("Broken", 72.0, 700.0, f64::NAN, 12.0, "Helvetica"),
        GlyphRun::new("sizes", 120.0, 700.0, 30.0, -4.0, "Helvetica"),
        GlyphRun::new("here", 170.0, 700.0, 0.0, f64::INFINITY, "Helvetica"),
    ]);
    let output = Converter::new(RenderOptions::default())
        .unwrap()
        .convert(&[page])
        .unwrap();
    assert!(!output.pages[0].fell_back);
    let text = output.pages[0].text.clone().unwrap_or_default();
    assert_eq!(visible_sorted(std::iter::once(text.as_str())), visible_sorted(["Broken", "sizes", "here"].into_iter()));
    assert!(!output.pages[0].markup.contains("NaN"));
}
