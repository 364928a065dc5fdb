use crate::buffer::HeightfieldBuffer;
use crate::options::TerrainOptions;

// Rescale the buffer's actual [min, max] onto the target interval through the
// options' easing: `ease((v - min) / (max - min)) * target_range + target_min`
//
// With `stretch` the target is exactly [min_height, max_height]; without it
// the actual range is only squeezed where it pokes outside those bounds.
// A constant buffer collapses onto the target minimum
pub fn clamp(g: &mut HeightfieldBuffer, options: &TerrainOptions) {
    if g.is_empty() {
        return;
    }
    let (min, max) = g.min_max();
    let actual_range = max - min;

    let (mut target_min, mut target_max) = if options.stretch {
        (options.min_height, options.max_height)
    } else {
        (min.max(options.min_height), max.min(options.max_height))
    };
    // The whole field lies outside the bounds. Resetting only the max would
    // collapse it onto a value outside [min_height, max_height], so both go
    if target_max < target_min {
        target_min = options.min_height;
        target_max = options.max_height;
    }
    let target_range = target_max - target_min;

    if actual_range <= f64::EPSILON * max.abs().max(1.0) {
        g.as_mut_slice().fill(target_min);
        return;
    }

    let easing = options.easing;
    for v in g.as_mut_slice() {
        *v = easing.apply((*v - min) / actual_range) * target_range + target_min;
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::clamp;
    use crate::buffer::HeightfieldBuffer;
    use crate::easing::Easing;
    use crate::options::TerrainOptions;

    fn random_buffer(seed: u64) -> HeightfieldBuffer {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let data = (0..11 * 9).map(|_| rng.gen_range(-500.0..900.0)).collect();
        HeightfieldBuffer::from_vec(10, 8, data).unwrap()
    }

    #[test]
    fn stretch_hits_both_bounds() {
        for (seed, easing) in [(1, Easing::Linear), (2, Easing::EaseInOut), (3, Easing::EaseInStrong)] {
            let options = TerrainOptions {
                easing,
                ..TerrainOptions::default()
            };
            let mut g = random_buffer(seed);
            clamp(&mut g, &options);
            let (lo, hi) = g.min_max();
            assert!((lo - options.min_height).abs() < 1e-9, "{easing:?}");
            assert!((hi - options.max_height).abs() < 1e-9, "{easing:?}");
        }
    }

    #[test]
    fn constant_buffer_collapses_to_target_min() {
        let mut g = HeightfieldBuffer::from_vec(2, 2, vec![42.0; 9]).unwrap();
        clamp(&mut g, &TerrainOptions::default());
        assert!(g.as_slice().iter().all(|&v| v == -100.0));
    }

    #[test]
    fn without_stretch_inner_ranges_are_kept() {
        let options = TerrainOptions {
            stretch: false,
            ..TerrainOptions::default()
        };
        let mut g = HeightfieldBuffer::from_vec(1, 1, vec![-10.0, 0.0, 5.0, 20.0]).unwrap();
        clamp(&mut g, &options);
        for (v, expected) in g.as_slice().iter().zip([-10.0, 0.0, 5.0, 20.0]) {
            assert!((v - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn without_stretch_outliers_are_squeezed() {
        let options = TerrainOptions {
            stretch: false,
            ..TerrainOptions::default()
        };
        let mut g = HeightfieldBuffer::from_vec(1, 1, vec![-300.0, 0.0, 50.0, 50.0]).unwrap();
        clamp(&mut g, &options);
        let (lo, hi) = g.min_max();
        assert!((lo + 100.0).abs() < 1e-9);
        assert!((hi - 50.0).abs() < 1e-9);
    }

    #[test]
    fn without_stretch_a_field_above_the_bounds_is_pulled_inside() {
        let options = TerrainOptions {
            stretch: false,
            ..TerrainOptions::default()
        };
        let mut g = HeightfieldBuffer::from_vec(1, 1, vec![300.0, 400.0, 500.0, 600.0]).unwrap();
        clamp(&mut g, &options);
        let (lo, hi) = g.min_max();
        assert!((lo - options.min_height).abs() < 1e-9);
        assert!((hi - options.max_height).abs() < 1e-9);
    }
}
