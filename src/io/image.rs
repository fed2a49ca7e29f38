//! Layer-stack alpha compositing and image encoding

use crate::catalog::CatalogItem;
use crate::generation::Combination;
use crate::io::configuration::OutputFormat;
use crate::io::error::{GenerationError, Result, invalid_parameter};
use image::{DynamicImage, ImageError, ImageReader, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Open a layer asset as 8-bit RGBA
///
/// The format is sniffed from the file contents, so an asset whose extension
/// disagrees with its encoding still decodes.
///
/// # Errors
///
/// Returns `AssetDecode` if the file cannot be opened or decoded
pub fn load_layer_image(item: &CatalogItem) -> Result<RgbaImage> {
    ImageReader::open(&item.file)
        .and_then(ImageReader::with_guessed_format)
        .map_err(ImageError::IoError)
        .and_then(ImageReader::decode)
        .map(DynamicImage::into_rgba8)
        .map_err(|e| GenerationError::AssetDecode {
            path: item.file.clone(),
            layer: item.layer_name.clone(),
            tier: item.rarity,
            item_id: None,
            source: e,
        })
}

/// Source-over blend of one pixel onto another
///
/// Fully opaque sources replace the destination exactly, fully transparent ones
/// leave it untouched.
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let [sr, sg, sb, sa] = src.0;
    match sa {
        255 => return src,
        0 => return dst,
        _ => {}
    }

    let [dr, dg, db, da] = dst.0;
    let src_a = f32::from(sa) / 255.0;
    let dst_a = f32::from(da) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    let channel = |s: u8, d: u8| -> u8 {
        let s = f32::from(s) / 255.0;
        let d = f32::from(d) / 255.0;
        let out = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(sr, dr),
        channel(sg, dg),
        channel(sb, db),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Draw `overlay` on top of `base`, anchored at the top-left corner
///
/// Pixels of `overlay` outside `base` are clipped.
pub fn alpha_composite(base: &mut RgbaImage, overlay: &RgbaImage) {
    let width = base.width().min(overlay.width());
    let height = base.height().min(overlay.height());

    for y in 0..height {
        for x in 0..width {
            let src = *overlay.get_pixel(x, y);
            let dst = base.get_pixel_mut(x, y);
            *dst = blend_over(*dst, src);
        }
    }
}

/// Stack a combination's images in layer order, first at the bottom
///
/// # Errors
///
/// Returns `AssetDecode` for the first asset that cannot be read, or a
/// configuration error for an empty combination
pub fn composite(combination: &Combination) -> Result<RgbaImage> {
    let mut items = combination.items().iter();
    let first = items.next().ok_or_else(|| {
        invalid_parameter("combination", &0, &"at least one layer is required")
    })?;

    let mut base = load_layer_image(first)?;
    for item in items {
        let overlay = load_layer_image(item)?;
        if overlay.dimensions() != base.dimensions() {
            debug!(
                layer = %item.layer_name,
                base = ?base.dimensions(),
                overlay = ?overlay.dimensions(),
                "layer size differs from base, clipping"
            );
        }
        alpha_composite(&mut base, &overlay);
    }

    Ok(base)
}

/// Encode a composed image in memory
///
/// Formats without transparency receive the color channels only.
///
/// # Errors
///
/// Returns the encoder's error if encoding fails
pub fn encode_image(
    image: &RgbaImage,
    format: OutputFormat,
) -> std::result::Result<Vec<u8>, image::ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    if format.supports_alpha() {
        image.write_to(&mut buffer, format.image_format())?;
    } else {
        DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .write_to(&mut buffer, format.image_format())?;
    }
    Ok(buffer.into_inner())
}

/// Write bytes produced for an item
///
/// # Errors
///
/// Returns `AssetWrite` if the destination cannot be written
pub fn write_output(output_path: &Path, bytes: &[u8], item_id: u64) -> Result<()> {
    std::fs::write(output_path, bytes).map_err(|e| GenerationError::AssetWrite {
        path: output_path.to_path_buf(),
        item_id: Some(item_id),
        source: e,
    })
}
