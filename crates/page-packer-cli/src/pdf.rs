//! PDF materializer: walks a `PackingResult` and draws each placement's
//! cropped source image onto the matching document page.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, RgbImage, Rgba, RgbaImage};
use page_packer_core::config::PageConfig;
use page_packer_core::model::PackingResult;
use page_packer_core::sizer::visible_bbox;
use printpdf::{Image, ImageTransform, Mm, PdfDocument, PdfLayerReference, Pt};
use tracing::info;

/// Raster images are embedded at this resolution; placement scale factors are
/// computed against it.
const RENDER_DPI: f32 = 300.0;

/// Writes `result` to a PDF at `path`, one document page per packed page.
///
/// `images` maps placement ids to their decoded sources; ids without pixels
/// (decode-failure placeholders) leave their slot blank. Pages are emitted
/// exactly once each, so an empty result still produces a valid one-page
/// document.
pub fn write_pdf(
    result: &PackingResult,
    images: &HashMap<String, DynamicImage>,
    cfg: &PageConfig,
    path: &Path,
) -> anyhow::Result<()> {
    let page_w = Mm::from(Pt(cfg.page_width as f32));
    let page_h = Mm::from(Pt(cfg.page_height as f32));

    let (doc, first_page, first_layer) = PdfDocument::new("page-packer", page_w, page_h, "content");
    let mut layers: Vec<PdfLayerReference> = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..result.page_count {
        let (page, layer) = doc.add_page(page_w, page_h, "content");
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for placement in &result.placements {
        let Some(source) = images.get(&placement.id) else {
            continue;
        };
        let rgba = source.to_rgba8();
        let bbox = visible_bbox(&rgba, cfg.alpha_threshold);
        let crop = image::imageops::crop_imm(&rgba, bbox.x, bbox.y, bbox.w, bbox.h).to_image();
        let rgb = flatten_onto_white(&crop);
        let (px_w, px_h) = rgb.dimensions();

        // printpdf bundles its own image crate; rebuild the buffer there to
        // keep the two crate versions independent.
        let raw = printpdf::image_crate::RgbImage::from_raw(px_w, px_h, rgb.into_raw())
            .context("image buffer size mismatch")?;
        let embedded =
            Image::from_dynamic_image(&printpdf::image_crate::DynamicImage::ImageRgb8(raw));

        // Engine coordinates are top-left points; PDF space is bottom-left.
        let x = Mm::from(Pt(placement.x as f32));
        let y = Mm::from(Pt(
            (cfg.page_height - placement.y - placement.h) as f32
        ));
        let intrinsic_w_mm = px_w as f32 * 25.4 / RENDER_DPI;
        let intrinsic_h_mm = px_h as f32 * 25.4 / RENDER_DPI;
        let target_w_mm = Mm::from(Pt(placement.w as f32)).0;
        let target_h_mm = Mm::from(Pt(placement.h as f32)).0;

        embedded.add_to_layer(
            layers[placement.page].clone(),
            ImageTransform {
                translate_x: Some(x),
                translate_y: Some(y),
                scale_x: Some(target_w_mm / intrinsic_w_mm),
                scale_y: Some(target_h_mm / intrinsic_h_mm),
                dpi: Some(RENDER_DPI),
                ..Default::default()
            },
        );
    }

    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .with_context(|| format!("write {}", path.display()))?;
    info!(?path, pages = result.page_count, "pdf written");
    Ok(())
}

/// PDF image streams carry no alpha here; composite translucent pixels over
/// white the way a viewer would show them on paper.
fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    let (w, h) = rgba.dimensions();
    let mut rgb = RgbImage::new(w, h);
    for (x, y, px) in rgba.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *px;
        let af = a as f32 / 255.0;
        let blend = |c: u8| (c as f32 * af + 255.0 * (1.0 - af)).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }
    rgb
}
