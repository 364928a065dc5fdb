// Grayscale heightmap images: export, import, PNG files

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};

use crate::buffer::HeightfieldBuffer;
use crate::error::TerrainError;
use crate::options::TerrainOptions;

// One pixel per vertex, [min_height, max_height] mapped onto 0..=255
pub fn to_heightmap(g: &HeightfieldBuffer, options: &TerrainOptions) -> GrayImage {
    let range = options.height_range();
    let mut img = GrayImage::new(g.xl() as u32, g.yl() as u32);
    for j in 0..g.yl() {
        for i in 0..g.xl() {
            let norm = if range > 0.0 {
                (g.get(i, j) - options.min_height) / range
            } else {
                0.0
            };
            let gray = (norm * 255.0).round().clamp(0.0, 255.0) as u8;
            img.put_pixel(i as u32, j as u32, Luma([gray]));
        }
    }
    img
}

// Read elevations out of any image: it is resampled to the grid and each
// pixel's (r + g + b) / 765 is mapped onto [min_height, max_height]
pub fn from_heightmap(img: &DynamicImage, options: &TerrainOptions) -> Result<HeightfieldBuffer, TerrainError> {
    options.validate()?;
    let (w, h) = (options.xl() as u32, options.yl() as u32);
    let mut rgb = img.to_rgb8();
    if rgb.dimensions() != (w, h) {
        log::debug!("resampling {:?} heightmap to {w}×{h}", rgb.dimensions());
        rgb = imageops::resize(&rgb, w, h, FilterType::Triangle);
    }

    let range = options.height_range();
    let mut g = HeightfieldBuffer::for_options(options);
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, gr, b] = pixel.0;
        let sum = r as f64 + gr as f64 + b as f64;
        g.set(x as usize, y as usize, sum / 765.0 * range + options.min_height);
    }
    Ok(g)
}

pub fn save_heightmap<P: AsRef<Path>>(g: &HeightfieldBuffer, options: &TerrainOptions, path: P) -> Result<(), TerrainError> {
    to_heightmap(g, options).save(path)?;
    Ok(())
}

pub fn load_heightmap<P: AsRef<Path>>(path: P, options: &TerrainOptions) -> Result<HeightfieldBuffer, TerrainError> {
    let img = image::open(path)?;
    from_heightmap(&img, options)
}
