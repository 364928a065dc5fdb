use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::unit;
use crate::buffer::HeightfieldBuffer;
use crate::filters::clamp;
use crate::options::TerrainOptions;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorleyDistance {
    #[default]
    Euclidean,
    Manhattan,
    Chebyshev,
}

impl WorleyDistance {
    #[inline]
    fn measure(self, dx: f64, dy: f64) -> f64 {
        match self {
            WorleyDistance::Euclidean => (dx * dx + dy * dy).sqrt(),
            WorleyDistance::Manhattan => dx.abs() + dy.abs(),
            WorleyDistance::Chebyshev => dx.abs().max(dy.abs()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorleyOptions {
    // Number of feature points; derived from grid size and frequency when None
    pub points: Option<usize>,
    pub distance: WorleyDistance,
}

// Cellular noise: every vertex sinks by its distance to the nearest feature
// point, giving ridged cells. Stretched back into the height range afterwards
pub fn worley(g: &mut HeightfieldBuffer, options: &TerrainOptions, worley: &WorleyOptions, rng: &mut ChaCha8Rng) {
    let count = worley.points.unwrap_or_else(|| {
        let cells = (options.x_segments * options.y_segments) as f64;
        (cells.sqrt() * options.frequency * 0.3).floor() as usize
    });
    let count = count.max(1);
    let (xw, yw) = options.segment_size();
    let points: Vec<(f64, f64)> = (0..count)
        .map(|_| (unit(rng) * options.x_size, unit(rng) * options.y_size))
        .collect();

    for j in 0..g.yl() {
        for i in 0..g.xl() {
            let (x, y) = (i as f64 * xw, j as f64 * yw);
            let nearest = points
                .iter()
                .map(|&(px, py)| worley.distance.measure(x - px, y - py))
                .fold(f64::INFINITY, f64::min);
            g.add(i, j, -nearest);
        }
    }
    clamp(g, &TerrainOptions { stretch: true, ..options.clone() });
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{WorleyDistance, WorleyOptions, worley};
    use crate::buffer::HeightfieldBuffer;
    use crate::options::TerrainOptions;

    #[test]
    fn single_point_peaks_at_its_vertex() {
        let options = TerrainOptions {
            x_segments: 16,
            y_segments: 16,
            ..TerrainOptions::default()
        };
        let mut g = HeightfieldBuffer::for_options(&options);
        let w = WorleyOptions {
            points: Some(1),
            distance: WorleyDistance::Chebyshev,
        };
        worley(&mut g, &options, &w, &mut ChaCha8Rng::seed_from_u64(2));
        let (lo, hi) = g.min_max();
        assert!((hi - options.max_height).abs() < 1e-9);
        assert!((lo - options.min_height).abs() < 1e-9);
    }
}
