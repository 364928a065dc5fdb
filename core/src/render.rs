// Coloured, hill-shaded preview of a heightfield

use std::f64::consts::FRAC_PI_4;

use image::{Rgb, RgbImage};
use palette::{Gradient, LinSrgb};

use crate::buffer::HeightfieldBuffer;

// Deep water to beach to grass to rock to snow
pub fn terrain_gradient() -> Gradient<LinSrgb> {
    Gradient::with_domain(vec![
        (0.00, LinSrgb::new(0.0, 0.0, 0.5)),
        (0.30, LinSrgb::new(0.8, 0.8, 0.5)),
        (0.50, LinSrgb::new(0.1, 0.6, 0.2)),
        (0.75, LinSrgb::new(0.5, 0.4, 0.3)),
        (1.00, LinSrgb::new(1.0, 1.0, 1.0)),
    ])
}

// Lambertian shade per vertex for a light at 45° azimuth and altitude.
// `z_scale` exaggerates the relief; border vertices stay unlit
pub fn hillshade(g: &HeightfieldBuffer, z_scale: f64) -> Vec<f64> {
    let (w, h) = (g.xl(), g.yl());
    let mut shade = vec![0.0; g.len()];
    let (sin_alt, cos_alt) = FRAC_PI_4.sin_cos();
    let (sin_az, cos_az) = FRAC_PI_4.sin_cos();
    let light = (cos_az * cos_alt, sin_az * cos_alt, sin_alt);

    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let dzdx = (g.get(x + 1, y) - g.get(x - 1, y)) * 0.5 * z_scale;
            let dzdy = (g.get(x, y + 1) - g.get(x, y - 1)) * 0.5 * z_scale;
            let (nx, ny, nz) = (-dzdx, -dzdy, 1.0);
            let len = (nx * nx + ny * ny + nz * nz).sqrt();
            let lambert = (nx * light.0 + ny * light.1 + nz * light.2) / len;
            shade[g.index(x, y)] = lambert.max(0.0);
        }
    }
    shade
}

// Gradient colour by normalized height, darkened by the hillshade
pub fn render_preview(g: &HeightfieldBuffer, z_scale: f64) -> RgbImage {
    let gradient = terrain_gradient();
    let shade = hillshade(g, z_scale);
    let (min, max) = g.min_max();
    let range = max - min;

    let mut img = RgbImage::new(g.xl() as u32, g.yl() as u32);
    for (k, &v) in g.as_slice().iter().enumerate() {
        let norm = if range > f64::EPSILON { (v - min) / range } else { 0.5 };
        let colour: LinSrgb = gradient.get(norm as f32);
        let rgb = colour.into_format::<u8>();
        let light = (shade[k] * 0.5 + 0.5).clamp(0.0, 1.0);
        let pixel = Rgb([
            (rgb.red as f64 * light) as u8,
            (rgb.green as f64 * light) as u8,
            (rgb.blue as f64 * light) as u8,
        ]);
        img.put_pixel((k % g.xl()) as u32, (k / g.xl()) as u32, pixel);
    }
    img
}

#[cfg(test)]
mod tests {
    use super::{hillshade, render_preview};
    use crate::buffer::HeightfieldBuffer;

    #[test]
    fn flat_ground_is_evenly_lit() {
        let g = HeightfieldBuffer::new(8, 8);
        let shade = hillshade(&g, 1.0);
        let inner = shade[g.index(4, 4)];
        assert!((inner - std::f64::consts::FRAC_PI_4.sin()).abs() < 1e-12);
        assert_eq!(shade[g.index(0, 4)], 0.0);
    }

    #[test]
    fn preview_matches_grid_size() {
        let mut g = HeightfieldBuffer::new(15, 9);
        g.set(7, 4, 50.0);
        let img = render_preview(&g, 1.0);
        assert_eq!(img.dimensions(), (16, 10));
        // The peak gets the snow end of the gradient
        assert!(img.get_pixel(7, 4).0[2] > img.get_pixel(2, 2).0[2]);
    }
}
