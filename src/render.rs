use glam::UVec2;
use image::{Rgba, RgbaImage};
use std::{collections::HashSet, path::Path};

use crate::{
    error::{JigsawError, Result},
    tile::{Pixel, Pixels},
};

const MARKED: Rgba<u8> = Rgba([20, 60, 110, 255]);
const UNMARKED: Rgba<u8> = Rgba([200, 225, 240, 255]);
const HIGHLIGHT: Rgba<u8> = Rgba([220, 70, 40, 255]);

/// Draws `image` with each pixel as a `scale` x `scale` block, painting
/// `highlight` cells in a third colour.
pub fn render(image: &Pixels, highlight: &HashSet<UVec2>, scale: u32) -> RgbaImage {
    let scale = scale.max(1);
    let (w, h) = (image.width() as u32, image.height() as u32);
    return RgbaImage::from_fn(w * scale, h * scale, |x, y| {
        let loc = UVec2::new(x / scale, y / scale);
        if highlight.contains(&loc) {
            return HIGHLIGHT;
        }
        match image.get(loc) {
            Some(Pixel::Marked) => MARKED,
            _ => UNMARKED,
        }
    });
}

pub fn save_png(path: &Path, image: &Pixels, highlight: &HashSet<UVec2>, scale: u32) -> Result<()> {
    let rgba = render(image, highlight, scale);
    rgba.save(path).map_err(|source| JigsawError::Render {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {}x{} picture to {}", rgba.width(), rgba.height(), path.display());
    return Ok(());
}
