use crate::config::PageConfig;
use crate::error::Result;
use crate::model::{Diagnostic, DiagnosticReason, PackingResult, Placement, Rectangle};

pub mod shelf;

pub use shelf::EPS;
use shelf::PageBook;

/// Packs `rects` onto fixed-size pages using shelf best-fit with decreasing
/// height and returns a deterministic, overlap-free placement per rectangle.
///
/// The working order is a contract, not an implementation detail: height
/// descending, ties by width descending, then by input position ascending.
/// Identical input and config always produce an identical result.
///
/// Oversized rectangles are clamped proportionally and flagged; rectangles
/// that cannot be placed even on an empty page are dropped with an
/// `Unplaceable` diagnostic. Only an invalid `PageConfig` is fatal.
pub fn pack(rects: &[Rectangle], cfg: &PageConfig) -> Result<PackingResult> {
    cfg.validate()?;

    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by(|&a, &b| {
        rects[b]
            .h
            .total_cmp(&rects[a].h)
            .then(rects[b].w.total_cmp(&rects[a].w))
            .then(a.cmp(&b))
    });

    let usable_w = cfg.usable_width();
    let usable_h = cfg.usable_height();
    let mut book = PageBook::new(cfg);
    let mut placements: Vec<Placement> = Vec::with_capacity(rects.len());
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for idx in order {
        let r = &rects[idx];
        if !(r.w.is_finite() && r.h.is_finite() && r.w > 0.0 && r.h > 0.0) {
            diagnostics.push(Diagnostic {
                id: r.id.clone(),
                reason: DiagnosticReason::Unplaceable {
                    message: format!("invalid dimensions {}x{}", r.w, r.h),
                },
            });
            continue;
        }

        let (mut w, mut h) = (r.w, r.h);
        let mut clamped = false;
        if w > usable_w + EPS {
            h *= usable_w / w;
            w = usable_w;
            clamped = true;
        }
        if h > usable_h + EPS {
            w *= usable_h / h;
            h = usable_h;
            clamped = true;
        }
        if clamped {
            tracing::debug!(id = %r.id, w, h, "clamped oversize rectangle");
            diagnostics.push(Diagnostic {
                id: r.id.clone(),
                reason: DiagnosticReason::Clamped,
            });
        }

        let spot = match book.try_place(w, h) {
            Some(p) => Some(p),
            None if book.active_page_is_empty() => None,
            None => {
                book.open_page();
                book.try_place(w, h)
            }
        };
        match spot {
            Some((page, x, y)) => placements.push(Placement {
                id: r.id.clone(),
                page,
                x,
                y,
                w,
                h,
                clamped,
            }),
            None => {
                tracing::warn!(id = %r.id, w, h, "rectangle does not fit an empty page");
                diagnostics.push(Diagnostic {
                    id: r.id.clone(),
                    reason: DiagnosticReason::Unplaceable {
                        message: format!("{}x{} does not fit an empty page", w, h),
                    },
                });
            }
        }
    }

    Ok(book.finalize(placements, diagnostics))
}
