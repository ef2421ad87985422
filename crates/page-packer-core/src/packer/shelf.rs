use crate::config::PageConfig;
use crate::model::{Diagnostic, PackingResult, Placement};

/// Tolerance for coordinate comparisons; exact fits must not be rejected
/// because of accumulated floating-point error.
pub const EPS: f64 = 1e-6;

/// A horizontal strip on a page holding rectangles left-to-right under a
/// shared height ceiling.
#[derive(Debug, Clone)]
pub(crate) struct Shelf {
    origin_y: f64,
    height: f64,
    cursor_x: f64,
    locked: bool,
    count: usize,
}

impl Shelf {
    fn new(origin_y: f64, left: f64) -> Self {
        Self {
            origin_y,
            height: 0.0,
            cursor_x: left,
            locked: false,
            count: 0,
        }
    }

    /// Width still available to the right of the last committed rectangle.
    fn remaining(&self, right: f64) -> f64 {
        right - self.cursor_x
    }

    /// Gutter owed before the next rectangle; the first occupant sits flush
    /// against the left margin.
    fn lead(&self, gutter_x: f64) -> f64 {
        if self.count > 0 { gutter_x } else { 0.0 }
    }

    /// Returns the leftover width after a hypothetical placement, or `None`
    /// if the rectangle is not admissible on this shelf.
    fn admits(&self, w: f64, h: f64, gutter_x: f64, right: f64, bottom: f64) -> Option<f64> {
        let needed = self.lead(gutter_x) + w;
        let avail = self.remaining(right);
        if needed > avail + EPS {
            return None;
        }
        let height_ok = if h <= self.height + EPS {
            true
        } else {
            // Raising the ceiling is allowed only while unlocked and while the
            // taller rectangle still clears the page bottom.
            !self.locked && self.origin_y + h <= bottom + EPS
        };
        if !height_ok {
            return None;
        }
        Some(avail - needed)
    }

    fn place(&mut self, w: f64, h: f64, gutter_x: f64) -> (f64, f64) {
        let x = self.cursor_x + self.lead(gutter_x);
        self.cursor_x = x + w;
        self.count += 1;
        if h > self.height + EPS && !self.locked {
            self.height = h;
        }
        // A committed rectangle at (or within epsilon of) the ceiling freezes
        // it; later, taller arrivals must open a new shelf instead of growing
        // a visually set one.
        if (h - self.height).abs() <= EPS {
            self.locked = true;
        }
        (x, self.origin_y)
    }
}

/// One open page: an append-only list of shelves in vertical order.
#[derive(Debug, Default)]
struct PageState {
    shelves: Vec<Shelf>,
}

/// Mutable per-run state the engine operates on: open pages, their shelves,
/// and the content box derived from the config. One instance per `pack` call.
#[derive(Debug)]
pub(crate) struct PageBook {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    gutter_x: f64,
    gutter_y: f64,
    pages: Vec<PageState>,
}

impl PageBook {
    /// Opens the book with a single empty page, so even an empty run yields a
    /// valid one-page result.
    pub(crate) fn new(cfg: &PageConfig) -> Self {
        Self {
            left: cfg.margin_left,
            right: cfg.page_width - cfg.margin_right,
            top: cfg.margin_top,
            bottom: cfg.page_height - cfg.margin_bottom,
            gutter_x: cfg.gutter_x,
            gutter_y: cfg.gutter_y,
            pages: vec![PageState::default()],
        }
    }

    pub(crate) fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub(crate) fn active_page_is_empty(&self) -> bool {
        self.pages
            .last()
            .map(|p| p.shelves.is_empty())
            .unwrap_or(true)
    }

    pub(crate) fn open_page(&mut self) {
        self.pages.push(PageState::default());
        tracing::debug!(page = self.pages.len() - 1, "opened page");
    }

    /// Origin y of the next shelf that would be opened on the active page.
    fn next_shelf_origin(&self) -> f64 {
        let page = self.pages.last().expect("book always has an active page");
        let mut y = self.top;
        for shelf in &page.shelves {
            y += shelf.height + self.gutter_y;
        }
        y
    }

    /// Vertical space left below the lowest shelf on the active page.
    pub(crate) fn remaining_vertical(&self) -> f64 {
        self.bottom - self.next_shelf_origin()
    }

    /// Attempts to place `w`x`h` on the active page: best-fit over its open
    /// shelves (minimal leftover width, earliest shelf on ties), then a new
    /// shelf below the lowest one if vertical room allows. Returns the page
    /// index and top-left position, or `None` if the page is exhausted.
    pub(crate) fn try_place(&mut self, w: f64, h: f64) -> Option<(usize, f64, f64)> {
        let page_index = self.pages.len() - 1;
        let (gutter_x, right, bottom) = (self.gutter_x, self.right, self.bottom);

        let mut best: Option<(usize, f64)> = None;
        {
            let page = self.pages.last().expect("book always has an active page");
            for (i, shelf) in page.shelves.iter().enumerate() {
                if let Some(leftover) = shelf.admits(w, h, gutter_x, right, bottom) {
                    match best {
                        Some((_, best_leftover)) if leftover >= best_leftover => {}
                        _ => best = Some((i, leftover)),
                    }
                }
            }
        }
        if let Some((i, _)) = best {
            let page = self.pages.last_mut().expect("book always has an active page");
            let (x, y) = page.shelves[i].place(w, h, gutter_x);
            return Some((page_index, x, y));
        }

        // No shelf fits; open one below the lowest if the rectangle clears
        // the bottom margin from there.
        if h <= self.remaining_vertical() + EPS && w <= self.right - self.left + EPS {
            let origin_y = self.next_shelf_origin();
            let mut shelf = Shelf::new(origin_y, self.left);
            let (x, y) = shelf.place(w, h, gutter_x);
            let page = self.pages.last_mut().expect("book always has an active page");
            page.shelves.push(shelf);
            tracing::debug!(page = page_index, origin_y, "opened shelf");
            return Some((page_index, x, y));
        }
        None
    }

    /// Freezes the run into an immutable result.
    pub(crate) fn finalize(
        self,
        placements: Vec<Placement>,
        diagnostics: Vec<Diagnostic>,
    ) -> PackingResult {
        PackingResult {
            placements,
            page_count: self.pages.len(),
            diagnostics,
        }
    }
}
