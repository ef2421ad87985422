//! Core library for packing trimmed raster images onto fixed-size pages.
//!
//! - Algorithm: shelf best-fit with decreasing height (NFDH/BFDH family);
//!   deterministic, overlap-free, margin-respecting, polynomial time.
//! - Pipeline: `pack_images` takes in-memory images, trims them to visible
//!   content, scales to the configured cap, and returns placements plus
//!   diagnostics; `pack` works on already-sized rectangles.
//! - Data model is serde-serializable; PDF rendering lives in the CLI crate.
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use page_packer_core::{ImageInput, PageConfig, pack_images};
//! # fn main() -> anyhow::Result<()> {
//! let img = ImageReader::open("a.png")?.decode()?;
//! let inputs = vec![ImageInput::decoded("a", img)];
//! let cfg = PageConfig::default();
//! let result = pack_images(inputs, &cfg)?;
//! println!("pages: {}", result.page_count);
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod sizer;

pub use config::*;
pub use error::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `page_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PageConfig, PageConfigBuilder, A4, LETTER, POINTS_PER_INCH};
    pub use crate::model::{
        Diagnostic, DiagnosticReason, PackStats, PackingResult, Placement, Rectangle,
    };
    pub use crate::packer::pack;
    pub use crate::pipeline::{pack_images, ImageInput};
    pub use crate::sizer::{sized_rect, visible_bbox, PixelRect};
}
