use rand_chacha::ChaCha8Rng;

use super::unit;
use crate::buffer::HeightfieldBuffer;
use crate::filters::clamp;
use crate::options::TerrainOptions;

// Value noise: random samples on lattices of 2^2 .. 2^6 cells per side,
// bilinearly interpolated and summed with weights falling off per octave
pub fn value(g: &mut HeightfieldBuffer, options: &TerrainOptions, rng: &mut ChaCha8Rng) {
    let segments = (options.x_segments.max(options.y_segments) + 1).next_power_of_two();
    let size = segments + 1;
    let range = options.height_range();
    let mut data = vec![0.0f64; size * size];

    for octave in 2..7 {
        let scale = 1usize << octave;
        if scale > segments {
            break;
        }
        let weight = range * 2f64.powf(2.4 - octave as f64 * 1.2);
        white_noise(&mut data, size, scale, weight, rng);
    }

    let (xl, yl) = (g.xl(), g.yl());
    for j in 0..yl {
        for i in 0..xl {
            g.add(i, j, data[j * size + i]);
        }
    }
    // Interpolation leaves plateaus and spikes near lattice points
    clamp(g, options);
}

// Add one octave: `scale` lattice cells per side, samples in [0, weight)
fn white_noise(data: &mut [f64], size: usize, scale: usize, weight: f64, rng: &mut ChaCha8Rng) {
    let segments = size - 1;
    let inc = segments / scale;
    let lattice = scale + 1;
    let samples: Vec<f64> = (0..lattice * lattice).map(|_| unit(rng) * weight).collect();
    let sample = |x: usize, y: usize| samples[y.min(scale) * lattice + x.min(scale)];

    for y in 0..size {
        let (cy, fy) = (y / inc, (y % inc) as f64 / inc as f64);
        for x in 0..size {
            let (cx, fx) = (x / inc, (x % inc) as f64 / inc as f64);
            let top = sample(cx, cy) * (1.0 - fx) + sample(cx + 1, cy) * fx;
            let bottom = sample(cx, cy + 1) * (1.0 - fx) + sample(cx + 1, cy + 1) * fx;
            data[y * size + x] += top * (1.0 - fy) + bottom * fy;
        }
    }
}
