use serde::{Deserialize, Serialize};

/// One typographic point is 1/72 inch; all geometry in this crate is in points.
pub const POINTS_PER_INCH: f64 = 72.0;

/// A4 portrait page size in points.
pub const A4: (f64, f64) = (595.28, 841.89);
/// US Letter portrait page size in points.
pub const LETTER: (f64, f64) = (612.0, 792.0);

/// Page geometry and sizing configuration.
///
/// All lengths are in points with a top-left origin. `max_rect_width` and
/// `max_rect_height` cap the footprint of a sized rectangle; the sizer scales
/// each trimmed image uniformly so its larger dimension meets the cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page width in points.
    pub page_width: f64,
    /// Page height in points.
    pub page_height: f64,

    /// Margins around the content box.
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,

    /// Horizontal gap between neighboring rectangles on a shelf.
    pub gutter_x: f64,
    /// Vertical gap between shelves.
    pub gutter_y: f64,

    /// Cap on a sized rectangle's width.
    pub max_rect_width: f64,
    /// Cap on a sized rectangle's height.
    pub max_rect_height: f64,

    /// Pixels with alpha <= this value count as transparent when trimming.
    #[serde(default)]
    pub alpha_threshold: u8,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            page_width: A4.0,
            page_height: A4.1,
            margin_top: POINTS_PER_INCH,
            margin_bottom: POINTS_PER_INCH,
            margin_left: POINTS_PER_INCH,
            margin_right: POINTS_PER_INCH,
            gutter_x: 0.2 * POINTS_PER_INCH,
            gutter_y: 0.2 * POINTS_PER_INCH,
            max_rect_width: 2.0 * POINTS_PER_INCH,
            max_rect_height: 2.0 * POINTS_PER_INCH,
            alpha_threshold: 0,
        }
    }
}

impl PageConfig {
    /// Usable content width between the left and right margins.
    pub fn usable_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Usable content height between the top and bottom margins.
    pub fn usable_height(&self) -> f64 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - Page dimensions are non-positive or non-finite
    /// - Margins, gutters, or caps are negative or non-finite
    /// - Margins consume the entire page (no usable content box)
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::PackError;

        if !(self.page_width > 0.0 && self.page_width.is_finite())
            || !(self.page_height > 0.0 && self.page_height.is_finite())
        {
            return Err(PackError::InvalidDimensions {
                width: self.page_width,
                height: self.page_height,
            });
        }

        let non_negative = [
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
            ("gutter_x", self.gutter_x),
            ("gutter_y", self.gutter_y),
        ];
        for (name, v) in non_negative {
            if !(v >= 0.0 && v.is_finite()) {
                return Err(PackError::InvalidConfig(format!(
                    "{} must be a non-negative finite value, got {}",
                    name, v
                )));
            }
        }

        for (name, v) in [
            ("max_rect_width", self.max_rect_width),
            ("max_rect_height", self.max_rect_height),
        ] {
            if !(v > 0.0 && v.is_finite()) {
                return Err(PackError::InvalidConfig(format!(
                    "{} must be a positive finite value, got {}",
                    name, v
                )));
            }
        }

        if self.usable_width() <= 0.0 {
            return Err(PackError::InvalidConfig(format!(
                "margins {} + {} leave no usable width on a {} wide page",
                self.margin_left, self.margin_right, self.page_width
            )));
        }
        if self.usable_height() <= 0.0 {
            return Err(PackError::InvalidConfig(format!(
                "margins {} + {} leave no usable height on a {} tall page",
                self.margin_top, self.margin_bottom, self.page_height
            )));
        }

        Ok(())
    }
}

/// Builder for `PageConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PageConfigBuilder {
    cfg: PageConfig,
}

impl PageConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PageConfig::default(),
        }
    }
    pub fn page_size(mut self, w: f64, h: f64) -> Self {
        self.cfg.page_width = w;
        self.cfg.page_height = h;
        self
    }
    pub fn margins(mut self, top: f64, bottom: f64, left: f64, right: f64) -> Self {
        self.cfg.margin_top = top;
        self.cfg.margin_bottom = bottom;
        self.cfg.margin_left = left;
        self.cfg.margin_right = right;
        self
    }
    pub fn uniform_margin(mut self, v: f64) -> Self {
        self.cfg.margin_top = v;
        self.cfg.margin_bottom = v;
        self.cfg.margin_left = v;
        self.cfg.margin_right = v;
        self
    }
    pub fn gutters(mut self, x: f64, y: f64) -> Self {
        self.cfg.gutter_x = x;
        self.cfg.gutter_y = y;
        self
    }
    pub fn max_rect(mut self, w: f64, h: f64) -> Self {
        self.cfg.max_rect_width = w;
        self.cfg.max_rect_height = h;
        self
    }
    pub fn alpha_threshold(mut self, v: u8) -> Self {
        self.cfg.alpha_threshold = v;
        self
    }
    pub fn build(self) -> PageConfig {
        self.cfg
    }
}

impl PageConfig {
    /// Create a fluent builder for `PageConfig`.
    pub fn builder() -> PageConfigBuilder {
        PageConfigBuilder::new()
    }
}
