use image::DynamicImage;
use tracing::instrument;

use crate::config::PageConfig;
use crate::error::Result;
use crate::model::{Diagnostic, DiagnosticReason, PackingResult, Rectangle};
use crate::packer::pack;
use crate::sizer::{sized_rect, visible_bbox};

/// One image entering a packing run: either a decoded image or the record of
/// a decode failure. Failures are absorbed, not propagated, so a single bad
/// file never aborts the batch.
pub struct ImageInput {
    pub key: String,
    image: Option<DynamicImage>,
    decode_error: Option<String>,
}

impl ImageInput {
    pub fn decoded(key: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            key: key.into(),
            image: Some(image),
            decode_error: None,
        }
    }

    pub fn failed(key: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            key: key.into(),
            image: None,
            decode_error: Some(error.to_string()),
        }
    }
}

#[instrument(skip_all)]
/// Trims each input to its visible content, scales it to the configured cap,
/// and packs the resulting rectangles onto pages.
///
/// Decode failures become 1x1 placeholder placements plus a `DecodeFailed`
/// diagnostic. The returned placements are keyed by the input keys, so the
/// caller can recover per-image identity for rendering.
pub fn pack_images(inputs: Vec<ImageInput>, cfg: &PageConfig) -> Result<PackingResult> {
    let mut rects: Vec<Rectangle> = Vec::with_capacity(inputs.len());
    let mut decode_diags: Vec<Diagnostic> = Vec::new();

    for input in &inputs {
        match (&input.image, &input.decode_error) {
            (Some(image), _) => {
                let rgba = image.to_rgba8();
                let bbox = visible_bbox(&rgba, cfg.alpha_threshold);
                rects.push(sized_rect(input.key.clone(), bbox.w, bbox.h, cfg));
            }
            (None, error) => {
                let message = error.clone().unwrap_or_else(|| "decode failed".into());
                tracing::warn!(key = %input.key, %message, "packing placeholder for bad input");
                decode_diags.push(Diagnostic {
                    id: input.key.clone(),
                    reason: DiagnosticReason::DecodeFailed { message },
                });
                rects.push(Rectangle::degenerate(input.key.clone()));
            }
        }
    }

    tracing::info!(count = rects.len(), failed = decode_diags.len(), "sized inputs");

    let mut result = pack(&rects, cfg)?;
    // Decode diagnostics come first; they predate any placement decision.
    decode_diags.extend(result.diagnostics);
    result.diagnostics = decode_diags;
    Ok(result)
}
