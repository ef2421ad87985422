use serde::{Deserialize, Serialize};

/// A sized input rectangle. `w`/`h` are in points and already aspect-correct;
/// the engine never mutates a `Rectangle`, it only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    /// User-specified identity (e.g., filename or asset path).
    pub id: String,
    pub w: f64,
    pub h: f64,
}

impl Rectangle {
    pub fn new(id: impl Into<String>, w: f64, h: f64) -> Self {
        Self { id: id.into(), w, h }
    }

    /// The 1x1 placeholder emitted when an input image cannot be decoded.
    /// Keeps the batch moving; the failure itself is reported via diagnostics.
    pub fn degenerate(id: impl Into<String>) -> Self {
        Self::new(id, 1.0, 1.0)
    }

    pub fn aspect(&self) -> f64 {
        self.w / self.h
    }
}

/// A placed rectangle within a page. `x,y` is top-left, in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    pub id: String,
    /// Zero-based page index.
    pub page: usize,
    pub x: f64,
    pub y: f64,
    /// Final size; equals the intrinsic size unless `clamped` is set.
    pub w: f64,
    pub h: f64,
    /// True if the rectangle was proportionally shrunk to fit the page.
    pub clamped: bool,
}

impl Placement {
    /// Exclusive right edge coordinate.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }
    /// Exclusive bottom edge coordinate.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
    /// True if the two placements overlap as axis-aligned rectangles.
    pub fn intersects(&self, other: &Placement) -> bool {
        !(self.x >= other.right()
            || other.x >= self.right()
            || self.y >= other.bottom()
            || other.y >= self.bottom())
    }
}

/// Why a rectangle was flagged during a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticReason {
    /// The source image could not be decoded; a 1x1 placeholder was packed.
    DecodeFailed { message: String },
    /// The rectangle exceeded the usable page area and was shrunk to fit.
    Clamped,
    /// The rectangle could not be placed even on an empty page; it was dropped.
    Unplaceable { message: String },
}

/// Per-rectangle report entry carried alongside a still-usable result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: String,
    pub reason: DiagnosticReason,
}

/// Finalized result of one packing run. Immutable once returned; placements
/// are in processing order (height-descending), not input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingResult {
    pub placements: Vec<Placement>,
    /// Number of pages opened; at least 1 even for empty input.
    pub page_count: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Statistics about packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    pub page_count: usize,
    /// Rectangles that received a placement.
    pub placed: usize,
    /// Placements that were clamped to fit.
    pub clamped: usize,
    /// Rectangles dropped as unplaceable.
    pub dropped: usize,
    /// Sum of placement areas, in square points.
    pub used_area: f64,
    /// Sum of usable page areas, in square points.
    pub page_area: f64,
    /// used_area / page_area (0.0 to 1.0). Higher is better.
    pub occupancy: f64,
}

impl PackingResult {
    /// Computes packing statistics against the usable area of `cfg`'s pages.
    pub fn stats(&self, cfg: &crate::config::PageConfig) -> PackStats {
        let used_area: f64 = self.placements.iter().map(|p| p.w * p.h).sum();
        let page_area = cfg.usable_width() * cfg.usable_height() * self.page_count as f64;
        let clamped = self.placements.iter().filter(|p| p.clamped).count();
        let dropped = self
            .diagnostics
            .iter()
            .filter(|d| matches!(d.reason, DiagnosticReason::Unplaceable { .. }))
            .count();
        PackStats {
            page_count: self.page_count,
            placed: self.placements.len(),
            clamped,
            dropped,
            used_area,
            page_area,
            occupancy: if page_area > 0.0 {
                used_area / page_area
            } else {
                0.0
            },
        }
    }
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Placed: {}, Occupancy: {:.2}%, Used Area: {:.1} pt², Clamped: {}, Dropped: {}",
            self.page_count,
            self.placed,
            self.occupancy * 100.0,
            self.used_area,
            self.clamped,
            self.dropped,
        )
    }

    /// Returns wasted usable space in square points.
    pub fn wasted_area(&self) -> f64 {
        (self.page_area - self.used_area).max(0.0)
    }
}
