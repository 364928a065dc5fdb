use std::f64::consts::PI;

use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::{CurveFn, unit};
use crate::NoiseGenerator;
use crate::buffer::HeightfieldBuffer;
use crate::options::TerrainOptions;
use crate::perlin2::Perlin2D;
use crate::simplex2::Simplex2D;

// Add `sample(i, j) * amplitude` to every vertex, one row per rayon task
// Each cell only depends on its own coordinates, so the result matches a
// sequential sweep exactly
fn accumulate<F>(g: &mut HeightfieldBuffer, amplitude: f64, sample: F)
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    let xl = g.xl();
    g.as_mut_slice()
        .par_chunks_mut(xl)
        .enumerate()
        .for_each(|(j, row)| {
            for (i, v) in row.iter_mut().enumerate() {
                *v += sample(i as f64, j as f64) * amplitude;
            }
        });
}

// Grid units per noise cycle: higher frequency gives a smaller divisor
#[inline]
fn divisor(options: &TerrainOptions) -> f64 {
    (options.x_segments.min(options.y_segments) + 1) as f64 / options.frequency
}

// Sample any coherent noise source over the grid at half the height range
pub fn coherent<N: NoiseGenerator + Sync>(g: &mut HeightfieldBuffer, options: &TerrainOptions, noise: &N) {
    let d = divisor(options);
    accumulate(g, options.height_range() * 0.5, |i, j| noise.get2(i / d, j / d));
}

pub fn perlin(g: &mut HeightfieldBuffer, options: &TerrainOptions, rng: &mut ChaCha8Rng) {
    coherent(g, options, &Perlin2D::from_rng(rng));
}

pub fn simplex(g: &mut HeightfieldBuffer, options: &TerrainOptions, rng: &mut ChaCha8Rng) {
    coherent(g, options, &Simplex2D::from_rng(rng));
}

// Crossed cosine waves with a random phase; two waves of a quarter range each
pub fn cosine(g: &mut HeightfieldBuffer, options: &TerrainOptions, rng: &mut ChaCha8Rng) {
    let scalar = options.frequency * PI / (options.x_segments.min(options.y_segments) + 1) as f64;
    let phase = unit(rng) * PI * 2.0;
    accumulate(g, options.height_range() * 0.25, |i, j| {
        (i * scalar + phase).cos() + (j * scalar + phase).cos()
    });
}

pub fn curve(g: &mut HeightfieldBuffer, options: &TerrainOptions, f: CurveFn) {
    let scalar = options.frequency / (options.x_segments.min(options.y_segments) + 1) as f64;
    accumulate(g, options.height_range() * 0.5, |i, j| f(i * scalar, j * scalar));
}
