use std::f64::consts::PI;

use rand_chacha::ChaCha8Rng;

use super::unit;
use crate::buffer::HeightfieldBuffer;
use crate::compositor::{Blend, InfluenceShape, influence};
use crate::easing::Easing;
use crate::options::TerrainOptions;

// Stamp `shape` at random places with random radius and height; `place` may
// remap the uniform (x, y) fractions before stamping
fn stamp_features<F>(
    g: &mut HeightfieldBuffer,
    options: &TerrainOptions,
    shape: InfluenceShape,
    rng: &mut ChaCha8Rng,
    mut place: F,
) where
    F: FnMut(f64, f64, &mut ChaCha8Rng) -> (f64, f64),
{
    let frequency = options.frequency * 2.0;
    let f2 = frequency * frequency;
    let count = (f2 * 10.0).round() as usize;
    let height_range = options.height_range();
    let (min_height, max_height) = (height_range / f2, height_range / frequency);
    let side = options.x_size.min(options.y_size);
    let (min_radius, max_radius) = (side / f2, side / frequency);

    for _ in 0..count {
        let radius = unit(rng) * (max_radius - min_radius) + min_radius;
        let height = unit(rng) * (max_height - min_height) + min_height;
        let (x, y) = (unit(rng), unit(rng));
        let (x, y) = place(x, y, rng);
        influence(
            g,
            options,
            shape,
            x,
            y,
            radius,
            height,
            Blend::Additive,
            Easing::EaseInStrong,
        );
    }
}

pub fn hill(g: &mut HeightfieldBuffer, options: &TerrainOptions, shape: InfluenceShape, rng: &mut ChaCha8Rng) {
    stamp_features(g, options, shape, rng, |x, y, _| (x, y));
}

// Polar remap keeps every feature within 40% of the center, producing an island
pub fn hill_island(g: &mut HeightfieldBuffer, options: &TerrainOptions, shape: InfluenceShape, rng: &mut ChaCha8Rng) {
    stamp_features(g, options, shape, rng, |x, y, rng| {
        let theta = unit(rng) * PI * 2.0;
        (0.5 + theta.cos() * x * 0.4, 0.5 + theta.sin() * y * 0.4)
    });
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{hill, hill_island};
    use crate::buffer::HeightfieldBuffer;
    use crate::compositor::InfluenceShape;
    use crate::options::TerrainOptions;

    #[test]
    fn hills_only_raise_terrain() {
        let options = TerrainOptions::default();
        let mut g = HeightfieldBuffer::for_options(&options);
        hill(&mut g, &options, InfluenceShape::Hill, &mut ChaCha8Rng::seed_from_u64(1));
        assert!(g.as_slice().iter().all(|&v| v >= 0.0));
        assert!(g.min_max().1 > 0.0);
    }

    #[test]
    fn island_leaves_corners_lower_than_center() {
        let options = TerrainOptions::default();
        let mut g = HeightfieldBuffer::for_options(&options);
        hill_island(&mut g, &options, InfluenceShape::Hill, &mut ChaCha8Rng::seed_from_u64(2));
        let corner = g.get(0, 0);
        let center = g.get(options.x_segments / 2, options.y_segments / 2);
        assert!(center > corner);
    }
}
