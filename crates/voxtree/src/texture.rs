//! Palette-strip texture generation.
//!
//! Meshes carry a single `color_coord` per vertex that samples a 256x1
//! texture; this module renders that strip from a document's palette.

use image::RgbaImage;
use voxtree_decode::{PALETTE_SIZE, Palette};

/// Render the palette as a 256x1 RGBA strip.
///
/// Pixel `i` holds the color of palette slot `i`, so a vertex's
/// `color_coord` lands on the pixel for its voxel's color byte minus one.
#[must_use]
pub fn palette_image(palette: &Palette) -> RgbaImage {
    let mut image = RgbaImage::new(PALETTE_SIZE as u32, 1);
    for (i, pixel) in image.pixels_mut().enumerate() {
        let argb = palette.colors[i];
        let a = (argb >> 24) as u8;
        let r = (argb >> 16) as u8;
        let g = (argb >> 8) as u8;
        let b = argb as u8;
        *pixel = image::Rgba([r, g, b, a]);
    }
    image
}
