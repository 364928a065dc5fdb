use std::f64::consts::PI;

use rand_chacha::ChaCha8Rng;

use super::{segment_diagonal, unit};
use crate::buffer::HeightfieldBuffer;
use crate::options::TerrainOptions;

// Fault lines: repeatedly split the grid with a random line, lifting one side
// and lowering the other. Within `smooth_distance` of the line the
// displacement follows a cosine ease so the fault has no vertical cliff
pub fn fault(g: &mut HeightfieldBuffer, options: &TerrainOptions, rng: &mut ChaCha8Rng) {
    let iterations = (segment_diagonal(options) * options.frequency).ceil().max(1.0) as usize;
    let displacement = options.height_range() * 0.5 / iterations as f64;
    let (xw, yw) = options.segment_size();
    let smooth_distance = xw.min(yw) * options.frequency;
    let world_diagonal = (options.x_size * options.x_size + options.y_size * options.y_size).sqrt();

    for _ in 0..iterations {
        // Line through the grid: a·x + b·y = c with (a, b) a unit normal
        let theta = unit(rng) * PI * 2.0;
        let (a, b) = (theta.sin(), theta.cos());
        let c = unit(rng) * world_diagonal - world_diagonal * 0.5;

        for j in 0..g.yl() {
            for i in 0..g.xl() {
                let distance = a * i as f64 * xw + b * j as f64 * yw - c;
                g.add(i, j, fault_profile(distance, smooth_distance, displacement));
            }
        }
    }
}

// Signed offset at `distance` from the line: ±displacement outside the band,
// a cosine ease from -displacement to +displacement across it
fn fault_profile(distance: f64, smooth_distance: f64, displacement: f64) -> f64 {
    if distance > smooth_distance {
        displacement
    } else if distance < -smooth_distance {
        -displacement
    } else {
        -((distance + smooth_distance) / (2.0 * smooth_distance) * PI).cos() * displacement
    }
}
