use rand_chacha::ChaCha8Rng;

use super::unit;
use crate::buffer::HeightfieldBuffer;
use crate::options::TerrainOptions;

// Diamond–Square midpoint displacement
// Runs on the smallest (2^n + 1)-sized square covering the target grid and
// copies the overlapping corner back; edges wrap with modulo indexing
pub fn diamond_square(g: &mut HeightfieldBuffer, options: &TerrainOptions, rng: &mut ChaCha8Rng) {
    let segments = (options.x_segments.max(options.y_segments) + 1).next_power_of_two();
    let size = segments + 1;
    let mut map = vec![0.0f64; size * size];
    let at = |x: usize, y: usize| y * size + x;

    // Amplitude of the random perturbation, halved at every level
    let mut smoothing = options.height_range();
    let mut step = segments;

    while step >= 2 {
        // Distance to the center from a corner
        let half = step / 2;
        smoothing /= 2.0;

        // Square step: center of every square = corner average + noise
        for x in (0..segments).step_by(step) {
            for y in (0..segments).step_by(step) {
                let d = unit(rng) * smoothing * 2.0 - smoothing;
                let avg = (map[at(x, y)]
                    + map[at(x + step, y)]
                    + map[at(x, y + step)]
                    + map[at(x + step, y + step)])
                    * 0.25;
                map[at(x + half, y + half)] = avg + d;
            }
        }

        // Diamond step: edge midpoints from their four wrapped neighbours
        for x in (0..segments).step_by(half) {
            let mut y = (x + half) % step;
            while y < segments {
                let d = unit(rng) * smoothing * 2.0 - smoothing;
                let avg = (map[at((x + size - half) % size, y)]
                    + map[at((x + half) % size, y)]
                    + map[at(x, (y + half) % size)]
                    + map[at(x, (y + size - half) % size)])
                    * 0.25
                    + d;
                map[at(x, y)] = avg;
                // Keep the opposite border in sync so the tile wraps
                if x == 0 {
                    map[at(segments, y)] = avg;
                }
                if y == 0 {
                    map[at(x, segments)] = avg;
                }
                y += step;
            }
        }

        step = half;
    }

    // Cells of the target grid map 1:1 onto the generation grid
    let (xl, yl) = (g.xl().min(size), g.yl().min(size));
    for j in 0..yl {
        for i in 0..xl {
            g.add(i, j, map[at(i, j)]);
        }
    }
}
