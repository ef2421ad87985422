use page_packer_core::config::PageConfig;
use page_packer_core::error::PackError;
use page_packer_core::model::{DiagnosticReason, Rectangle};
use page_packer_core::packer::pack;

/// Test zero-sized page dimensions
#[test]
fn test_zero_width() {
    let cfg = PageConfig {
        page_width: 0.0,
        ..Default::default()
    };

    let result = cfg.validate();
    assert!(result.is_err());
    match result {
        Err(PackError::InvalidDimensions { width, height }) => {
            assert_eq!(width, 0.0);
            assert!(height > 0.0);
        }
        _ => panic!("Expected InvalidDimensions error"),
    }
}

#[test]
fn test_negative_height() {
    let cfg = PageConfig {
        page_height: -11.0,
        ..Default::default()
    };

    assert!(matches!(
        cfg.validate(),
        Err(PackError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_nan_gutter_rejected() {
    let cfg = PageConfig {
        gutter_x: f64::NAN,
        ..Default::default()
    };

    match cfg.validate() {
        Err(PackError::InvalidConfig(msg)) => assert!(msg.contains("gutter_x")),
        other => panic!("Expected InvalidConfig, got {:?}", other.err()),
    }
}

#[test]
fn test_negative_margin_rejected() {
    let cfg = PageConfig {
        margin_left: -1.0,
        ..Default::default()
    };

    match cfg.validate() {
        Err(PackError::InvalidConfig(msg)) => assert!(msg.contains("margin_left")),
        other => panic!("Expected InvalidConfig, got {:?}", other.err()),
    }
}

/// Margins that consume the entire page leave no usable area
#[test]
fn test_margins_consume_page() {
    let cfg = PageConfig {
        page_width: 100.0,
        page_height: 100.0,
        margin_left: 50.0,
        margin_right: 50.0,
        ..Default::default()
    };

    match cfg.validate() {
        Err(PackError::InvalidConfig(msg)) => assert!(msg.contains("usable width")),
        other => panic!("Expected InvalidConfig, got {:?}", other.err()),
    }
}

/// An invalid config is fatal at pack() time, before any placement work
#[test]
fn test_pack_rejects_invalid_config() {
    let cfg = PageConfig {
        page_width: 0.0,
        ..Default::default()
    };
    let rects = vec![Rectangle::new("a", 10.0, 10.0)];
    assert!(pack(&rects, &cfg).is_err());
}

#[test]
fn test_default_config_is_valid() {
    assert!(PageConfig::default().validate().is_ok());
}

/// Zero or non-finite rectangle dimensions are reported, never placed
#[test]
fn test_degenerate_rect_dimensions() {
    let cfg = PageConfig::default();
    let rects = vec![
        Rectangle::new("ok", 100.0, 100.0),
        Rectangle::new("zero_w", 0.0, 32.0),
        Rectangle::new("nan_h", 32.0, f64::NAN),
    ];

    let result = pack(&rects, &cfg).unwrap();
    assert_eq!(result.placements.len(), 1);
    assert_eq!(result.placements[0].id, "ok");
    let dropped: Vec<&str> = result
        .diagnostics
        .iter()
        .filter(|d| matches!(d.reason, DiagnosticReason::Unplaceable { .. }))
        .map(|d| d.id.as_str())
        .collect();
    assert!(dropped.contains(&"zero_w"));
    assert!(dropped.contains(&"nan_h"));
}

/// A rectangle exactly as wide as the usable width must still be placeable;
/// the gutter is owed between neighbors, not at the margins.
#[test]
fn test_exact_width_fit() {
    let cfg = PageConfig {
        page_width: 10.0,
        page_height: 10.0,
        margin_top: 1.0,
        margin_bottom: 1.0,
        margin_left: 1.0,
        margin_right: 1.0,
        gutter_x: 0.5,
        gutter_y: 0.5,
        max_rect_width: 8.0,
        max_rect_height: 8.0,
        alpha_threshold: 0,
    };
    let rects = vec![Rectangle::new("exact", 8.0, 2.0)];
    let result = pack(&rects, &cfg).unwrap();
    assert_eq!(result.placements.len(), 1);
    let p = &result.placements[0];
    assert!(!p.clamped);
    assert!((p.x - 1.0).abs() < 1e-9);
    assert!((p.right() - 9.0).abs() < 1e-9);
}

/// Clamping applies to height as well, before any shelf placement
#[test]
fn test_tall_rect_clamped_on_height() {
    let cfg = PageConfig {
        page_width: 8.5,
        page_height: 11.0,
        margin_top: 1.0,
        margin_bottom: 1.0,
        margin_left: 1.0,
        margin_right: 1.0,
        gutter_x: 0.2,
        gutter_y: 0.2,
        max_rect_width: 30.0,
        max_rect_height: 30.0,
        alpha_threshold: 0,
    };
    let rects = vec![Rectangle::new("tall", 2.0, 18.0)];
    let result = pack(&rects, &cfg).unwrap();
    let p = &result.placements[0];
    assert!(p.clamped);
    assert!((p.h - 9.0).abs() < 1e-9);
    assert!((p.w - 1.0).abs() < 1e-9);
}

/// Many small rectangles pack without panicking and stay on few pages
#[test]
fn test_many_small_rects() {
    let cfg = PageConfig {
        page_width: 8.5,
        page_height: 11.0,
        margin_top: 1.0,
        margin_bottom: 1.0,
        margin_left: 1.0,
        margin_right: 1.0,
        gutter_x: 0.1,
        gutter_y: 0.1,
        max_rect_width: 2.0,
        max_rect_height: 2.0,
        alpha_threshold: 0,
    };
    let rects: Vec<Rectangle> = (0..100)
        .map(|i| Rectangle::new(format!("small_{}", i), 0.5, 0.5))
        .collect();

    let result = pack(&rects, &cfg).unwrap();
    assert_eq!(result.placements.len(), 100);
    // 11 per shelf, 15 shelves per page
    assert_eq!(result.page_count, 1);
}
