use page_packer_core::config::PageConfig;
use page_packer_core::model::{DiagnosticReason, Rectangle};
use page_packer_core::packer::pack;

/// Inch-based page used across the scenario tests; the engine is
/// unit-agnostic, so running it in inches keeps the expected values legible.
fn letter_cfg() -> PageConfig {
    PageConfig {
        page_width: 8.5,
        page_height: 11.0,
        margin_top: 1.0,
        margin_bottom: 1.0,
        margin_left: 1.0,
        margin_right: 1.0,
        gutter_x: 0.2,
        gutter_y: 0.2,
        max_rect_width: 2.0,
        max_rect_height: 2.0,
        alpha_threshold: 0,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn five_unit_squares_share_one_shelf() {
    let rects: Vec<Rectangle> = (0..5)
        .map(|i| Rectangle::new(format!("sq_{}", i), 1.0, 1.0))
        .collect();
    let result = pack(&rects, &letter_cfg()).unwrap();

    assert_eq!(result.page_count, 1);
    assert_eq!(result.placements.len(), 5);
    let expected_x = [1.0, 2.2, 3.4, 4.6, 5.8];
    for (p, ex) in result.placements.iter().zip(expected_x) {
        assert_eq!(p.page, 0);
        assert!(approx(p.x, ex), "x = {}, expected {}", p.x, ex);
        assert!(approx(p.y, 1.0));
        assert!(!p.clamped);
    }
    // equal sizes keep input order through the tie-break
    let ids: Vec<&str> = result.placements.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["sq_0", "sq_1", "sq_2", "sq_3", "sq_4"]);
}

#[test]
fn oversize_rectangle_is_clamped_proportionally() {
    let rects = vec![Rectangle::new("wide", 20.0, 10.0)];
    let result = pack(&rects, &letter_cfg()).unwrap();

    assert_eq!(result.placements.len(), 1);
    let p = &result.placements[0];
    assert!(p.clamped);
    assert!(approx(p.w, 6.5), "width = {}", p.w);
    assert!(approx(p.h, 3.25), "height = {}", p.h);
    assert!(approx(p.x, 1.0));
    assert!(approx(p.y, 1.0));
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.id == "wide" && d.reason == DiagnosticReason::Clamped));
}

#[test]
fn empty_input_still_yields_one_page() {
    let result = pack(&[], &letter_cfg()).unwrap();
    assert!(result.placements.is_empty());
    assert_eq!(result.page_count, 1);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn exhausted_vertical_space_opens_second_page() {
    // Three full-shelf rectangles, 4.0 tall each: two fit between the
    // margins (1.0 + 4.0 + 0.2 + 4.0 = 9.2 <= 10.0), the third does not.
    let rects: Vec<Rectangle> = (0..3)
        .map(|i| Rectangle::new(format!("band_{}", i), 6.0, 4.0))
        .collect();
    let result = pack(&rects, &letter_cfg()).unwrap();

    assert_eq!(result.page_count, 2);
    assert_eq!(result.placements.len(), 3);
    assert_eq!(result.placements[0].page, 0);
    assert_eq!(result.placements[1].page, 0);
    assert_eq!(result.placements[2].page, 1);
    assert!(approx(result.placements[2].x, 1.0));
    assert!(approx(result.placements[2].y, 1.0));
}

#[test]
fn second_shelf_opens_below_the_first() {
    // 2.0-tall rectangles fill the first shelf; the 1.0-tall one starts a
    // second shelf at y = 1.0 + 2.0 + 0.2.
    let rects = vec![
        Rectangle::new("a", 3.0, 2.0),
        Rectangle::new("b", 3.0, 2.0),
        Rectangle::new("c", 3.0, 1.0),
    ];
    let result = pack(&rects, &letter_cfg()).unwrap();

    assert_eq!(result.page_count, 1);
    let c = result.placements.iter().find(|p| p.id == "c").unwrap();
    assert!(approx(c.x, 1.0));
    assert!(approx(c.y, 3.2));
}

#[test]
fn best_fit_prefers_the_tighter_shelf() {
    // Shelf 0 keeps 6.5 - 5.0 = 1.5 free, shelf 1 keeps 6.5 - 4.0 = 2.5.
    // A 1.2-wide rectangle fits both (lead gutter 0.2); best-fit takes the
    // tighter leftover on shelf 0 rather than the lower shelf.
    let rects = vec![
        Rectangle::new("row0", 5.0, 2.0),
        Rectangle::new("row1", 4.0, 1.5),
        Rectangle::new("fill", 1.2, 1.0),
    ];
    let result = pack(&rects, &letter_cfg()).unwrap();

    let fill = result.placements.iter().find(|p| p.id == "fill").unwrap();
    assert!(approx(fill.y, 1.0), "expected shelf 0, got y = {}", fill.y);
    assert!(approx(fill.x, 6.2));
}
