use std::f64::consts::PI;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{segment_diagonal, unit};
use crate::buffer::HeightfieldBuffer;
use crate::options::TerrainOptions;

// 8-connected neighbour offsets
const NEIGHBORS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

// Attempts at finding a lower neighbour before the particle settles
const ROLL_ATTEMPTS: usize = 3;

// Particle deposition: drop particles around a slowly drifting origin; each
// one rolls downhill before adding a fixed amount of material
pub fn particles(g: &mut HeightfieldBuffer, options: &TerrainOptions, rng: &mut ChaCha8Rng) {
    let iterations = (segment_diagonal(options) * options.frequency * 300.0).ceil() as usize;
    if iterations == 0 {
        return;
    }
    let displacement = options.height_range() / iterations as f64 * 1000.0;
    let (xs, ys) = (options.x_segments as f64, options.y_segments as f64);

    let mut i = (unit(rng) * xs) as isize;
    let mut j = (unit(rng) * ys) as isize;
    let mut x_deviation = unit(rng) * 0.2 - 0.1;
    let mut y_deviation = unit(rng) * 0.2 - 0.1;

    for k in 0..iterations {
        deposit(g, i, j, displacement, rng);

        let d = unit(rng) * PI * 2.0;
        if k % 1000 == 0 {
            x_deviation = unit(rng) * 0.2 - 0.1;
            y_deviation = unit(rng) * 0.2 - 0.1;
        }
        if k % 100 == 0 {
            let x = xs * (0.5 + x_deviation) + d.cos() * unit(rng) * xs * (0.5 - x_deviation.abs());
            let y = ys * (0.5 + y_deviation) + d.sin() * unit(rng) * ys * (0.5 - y_deviation.abs());
            i = (x.floor() as isize).clamp(0, options.x_segments as isize);
            j = (y.floor() as isize).clamp(0, options.y_segments as isize);
        }
    }
}

// Roll from (i, j) to a random lower neighbour until none is found within
// ROLL_ATTEMPTS tries, then deposit there. Every move strictly descends so
// the walk always ends
fn deposit(g: &mut HeightfieldBuffer, i: isize, j: isize, displacement: f64, rng: &mut ChaCha8Rng) {
    let Some(mut current) = g.checked_index(i, j) else {
        return;
    };
    let (mut i, mut j) = (i, j);
    'roll: loop {
        for _ in 0..ROLL_ATTEMPTS {
            let (di, dj) = NEIGHBORS[rng.gen_range(0..NEIGHBORS.len())];
            if let Some(next) = g.checked_index(i + di, j + dj) {
                if g.as_slice()[next] < g.as_slice()[current] {
                    current = next;
                    i += di;
                    j += dj;
                    continue 'roll;
                }
            }
        }
        break;
    }
    g.as_mut_slice()[current] += displacement;
}
