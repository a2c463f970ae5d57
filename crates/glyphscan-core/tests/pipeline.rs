//! End-to-end detection scenarios over the public API.

use glyphscan_core::*;

fn run(glyphs: &[Glyph], options: &GroupOptions, threshold: f64) -> (Grouping, OverlapReport) {
    let grouping = group_by_page(glyphs, options).unwrap();
    let report = find_overlaps(&grouping.pages, threshold);
    (grouping, report)
}

#[test]
fn test_two_identical_glyphs() {
    let a = Glyph::new("A", 1, BBox::new(0.0, 0.0, 10.0, 10.0), 12.0);
    let (_, report) = run(&[a.clone(), a], &GroupOptions::default(), 0.0);

    assert_eq!(report.total(), 1);
    assert_eq!(report.overlaps[0].percentage_of_union(), 100.0);
    assert_eq!(report.overlaps[0].char_a, "A");
    assert_eq!(report.overlaps[0].char_b, "A");

    let stats = character_statistics(&report.overlaps);
    assert_eq!(stats.character_stats[0].overlap_count, 2);
}

#[test]
fn test_empty_glyph_list() {
    let (grouping, report) = run(&[], &GroupOptions::default(), 0.0);
    assert!(grouping.pages.is_empty());
    assert_eq!(report.total(), 0);
    assert!(report.highlights.is_empty());
    assert!(character_statistics(&report.overlaps).is_empty());
}

#[test]
fn test_watermark_over_body_text_is_ignored() {
    let glyphs = vec![
        Glyph::new("h", 1, BBox::new(100.0, 100.0, 6.0, 10.0), 11.0),
        Glyph::new("e", 1, BBox::new(106.0, 100.0, 6.0, 10.0), 11.0),
        // Diagonal stamp letter sitting on top of the word
        Glyph::new("P", 1, BBox::new(98.0, 95.0, 30.0, 40.0), 48.0),
    ];

    let (grouping, report) = run(&glyphs, &GroupOptions::default(), 0.0);
    assert_eq!(grouping.filtered, 1);
    assert_eq!(report.total(), 0);

    let keep_all = GroupOptions {
        filter_watermarks: false,
        ..GroupOptions::default()
    };
    let (_, report) = run(&glyphs, &keep_all, 0.0);
    assert_eq!(report.total(), 2);
}

#[test]
fn test_trimming_removes_kerning_overlap() {
    // Tightly kerned pair whose advance boxes overlap by 0.4pt
    let glyphs = vec![
        Glyph::new("a", 1, BBox::new(100.0, 100.0, 6.0, 10.0), 11.0),
        Glyph::new("v", 1, BBox::new(105.6, 100.0, 6.0, 10.0), 11.0),
    ];

    let (_, untrimmed) = run(&glyphs, &GroupOptions::default(), 0.0);
    assert_eq!(untrimmed.total(), 1);

    let trimmed_options = GroupOptions {
        trim_whitespace: true,
        ..GroupOptions::default()
    };
    let (grouping, trimmed) = run(&glyphs, &trimmed_options, 0.0);
    assert_eq!(grouping.trimmed, 2);
    assert_eq!(trimmed.total(), 0);
}

#[test]
fn test_correction_overlay_collision() {
    // Replacement text set on top of the original word
    let glyphs = vec![
        Glyph::new("c", 2, BBox::new(100.0, 400.0, 5.0, 10.0), 10.0),
        Glyph::new("a", 2, BBox::new(105.0, 400.0, 5.0, 10.0), 10.0),
        Glyph::new("t", 2, BBox::new(110.0, 400.0, 3.0, 10.0), 10.0),
        Glyph::new("d", 2, BBox::new(101.0, 401.0, 5.0, 10.0), 10.0),
        Glyph::new("o", 2, BBox::new(106.0, 401.0, 5.0, 10.0), 10.0),
        Glyph::new("g", 2, BBox::new(111.0, 401.0, 5.0, 10.0), 10.0),
    ];

    let (_, report) = run(&glyphs, &GroupOptions::default(), 10.0);
    assert!(report.total() >= 3);
    assert!(report.overlaps.iter().all(|o| o.page == 2));
    assert!(report.overlaps.iter().all(|o| o.percentage_of_union() > 10.0));

    let highlights = &report.highlights[&2];
    let counts = count_positions(highlights.boxes(), 612.0, 792.0);
    let label = PositionLabel::classify(100.0, 400.0, 612.0, 792.0);
    assert_eq!(label.to_string(), "middle-left");
    assert_eq!(counts[&label], highlights.len());
}
