// Combining passes and placing single features on a heightfield

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::buffer::HeightfieldBuffer;
use crate::easing::Easing;
use crate::filters::Filter;
use crate::generators::Generator;
use crate::options::TerrainOptions;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum PassMethod {
    Generate(Generator),
    Filter(Filter),
}

// One MultiPass stage
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pass {
    pub method: PassMethod,
    // Share of the overall height range this pass may use, in (0, 1]
    pub amplitude: f64,
    // Overrides the frequency of the surrounding options
    pub frequency: Option<f64>,
}

impl Pass {
    pub fn generate(generator: Generator) -> Self {
        Self {
            method: PassMethod::Generate(generator),
            amplitude: 1.0,
            frequency: None,
        }
    }

    pub fn filter(filter: Filter) -> Self {
        Self {
            method: PassMethod::Filter(filter),
            amplitude: 1.0,
            frequency: None,
        }
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = Some(frequency);
        self
    }
}

// Run `passes` in order. Each pass sees the height range shrunk symmetrically
// around its midpoint by its amplitude, so generators scale their output
// without knowing they are being blended
pub fn multi_pass(g: &mut HeightfieldBuffer, options: &TerrainOptions, passes: &[Pass], rng: &mut ChaCha8Rng) {
    let range = options.height_range();
    for pass in passes {
        let shrink = 0.5 * (range - range * pass.amplitude);
        let pass_options = TerrainOptions {
            min_height: options.min_height + shrink,
            max_height: options.max_height - shrink,
            frequency: pass.frequency.unwrap_or(options.frequency),
            ..options.clone()
        };
        match &pass.method {
            PassMethod::Generate(generator) => generator.apply(g, &pass_options, rng),
            PassMethod::Filter(filter) => filter.apply(g, &pass_options),
        }
    }
}

// Radial feature profile: (normalized distance, normalized dx, normalized dy) -> height factor
pub type InfluenceFn = fn(f64, f64, f64) -> f64;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub enum InfluenceShape {
    // Flat-topped plateau
    Mesa,
    // Inverted mesa
    Hole,
    #[default]
    Hill,
    // Inverted hill
    Valley,
    Dome,
    Flat,
    // Raised rim around a crater
    Volcano,
    #[serde(skip)]
    Custom(InfluenceFn),
}

impl InfluenceShape {
    // Height factor at normalized radial distance `d` ∈ [0, 1]
    pub fn evaluate(self, d: f64, dx: f64, dy: f64) -> f64 {
        match self {
            InfluenceShape::Mesa => mesa(d),
            InfluenceShape::Hole => -mesa(d),
            InfluenceShape::Hill => hill(d),
            InfluenceShape::Valley => -hill(d),
            InfluenceShape::Dome => -(d + 1.0) * (d - 1.0),
            InfluenceShape::Flat => 0.0,
            InfluenceShape::Volcano => {
                0.94 - 0.32 * ((2.0 * d).abs() + (2.0 * std::f64::consts::PI * d.abs() + 0.4).cos())
            }
            InfluenceShape::Custom(f) => f(d, dx, dy),
        }
    }
}

#[inline]
fn mesa(d: f64) -> f64 {
    1.25 * (-(d * d)).exp().min(0.8)
}

// Mirrored smoothstep: 1 at the center, 0 at the rim
#[inline]
fn hill(d: f64) -> f64 {
    let t = 1.0 - d.abs().min(1.0);
    t * t * (3.0 - 2.0 * t)
}

// (existing, delta, normalized distance, normalized dx, normalized dy) -> new value
pub type BlendFn = fn(f64, f64, f64, f64, f64) -> f64;

#[derive(Clone, Copy, Debug)]
pub enum Blend {
    Additive,
    Subtractive,
    Multiply,
    // Replace the existing value with the feature
    Overwrite,
    // Eased lerp between the existing value and the feature
    Normal,
    Custom(BlendFn),
}

// Place one feature of `radius` (world units) and `height` centered at the
// percentage coordinates (x, y). Only cells inside the radius are touched
#[allow(clippy::too_many_arguments)]
pub fn influence(
    g: &mut HeightfieldBuffer,
    options: &TerrainOptions,
    shape: InfluenceShape,
    x: f64,
    y: f64,
    radius: f64,
    height: f64,
    blend: Blend,
    easing: Easing,
) {
    if radius <= 0.0 {
        return;
    }
    let (xl, yl) = (g.xl() as f64, g.yl() as f64);
    // Feature center in grid units
    let (vx, vy) = (xl * x, yl * y);
    let (xw, yw) = options.segment_size();
    let (rx, ry) = (radius / xw, radius / yw);
    let r1 = 1.0 / radius;

    let xs = (vx - rx).ceil().max(0.0) as usize;
    let xe = (vx + rx).floor().min(xl - 1.0);
    let ys = (vy - ry).ceil().max(0.0) as usize;
    let ye = (vy + ry).floor().min(yl - 1.0);
    if xe < 0.0 || ye < 0.0 {
        return;
    }
    let (xe, ye) = (xe as usize, ye as usize);

    for j in ys..=ye {
        for i in xs..=xe {
            let fdx = (i as f64 - vx) * xw;
            let fdy = (j as f64 - vy) * yw;
            let fd = (fdx * fdx + fdy * fdy).sqrt();
            // Bounding box corners lie outside the circle
            if fd > radius {
                continue;
            }
            let (fdr, fdxr, fdyr) = (fd * r1, fdx * r1, fdy * r1);
            let falloff = easing.apply(fdr);
            let d = shape.evaluate(fdr, fdxr, fdyr) * height * (1.0 - falloff);
            let k = g.index(i, j);
            let cell = &mut g.as_mut_slice()[k];
            *cell = match blend {
                Blend::Additive => *cell + d,
                Blend::Subtractive => *cell - d,
                Blend::Multiply => *cell * d,
                Blend::Overwrite => d,
                Blend::Normal => falloff * *cell + d,
                Blend::Custom(f) => f(*cell, d, fdr, fdxr, fdyr),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{Blend, InfluenceShape, Pass, influence, multi_pass};
    use crate::buffer::HeightfieldBuffer;
    use crate::easing::Easing;
    use crate::generators::Generator;
    use crate::options::TerrainOptions;

    fn grid() -> TerrainOptions {
        TerrainOptions {
            x_segments: 20,
            y_segments: 20,
            x_size: 200.0,
            y_size: 200.0,
            ..TerrainOptions::default()
        }
    }

    #[test]
    fn influence_only_touches_the_circle() {
        let options = grid();
        let mut g = HeightfieldBuffer::for_options(&options);
        influence(
            &mut g,
            &options,
            InfluenceShape::Dome,
            0.5,
            0.5,
            50.0,
            10.0,
            Blend::Additive,
            Easing::Linear,
        );
        // Center (10.5, 10.5) in grid units; 50 world units = 5 cells
        assert!(g.get(10, 10) > 0.0);
        assert_eq!(g.get(0, 0), 0.0);
        assert_eq!(g.get(10, 2), 0.0);
        assert_eq!(g.get(16, 16), 0.0);
    }

    #[test]
    fn overwrite_and_custom_blends() {
        let options = grid();
        let mut g = HeightfieldBuffer::for_options(&options);
        g.as_mut_slice().fill(5.0);
        influence(
            &mut g,
            &options,
            InfluenceShape::Flat,
            0.5,
            0.5,
            30.0,
            10.0,
            Blend::Overwrite,
            Easing::Linear,
        );
        assert_eq!(g.get(10, 10), 0.0);
        assert_eq!(g.get(0, 0), 5.0);

        influence(
            &mut g,
            &options,
            InfluenceShape::Flat,
            0.5,
            0.5,
            30.0,
            10.0,
            Blend::Custom(|existing, _, _, _, _| existing + 1.0),
            Easing::Linear,
        );
        assert_eq!(g.get(10, 10), 1.0);
    }

    #[test]
    fn influence_off_grid_is_a_no_op() {
        let options = grid();
        let mut g = HeightfieldBuffer::for_options(&options);
        influence(
            &mut g,
            &options,
            InfluenceShape::Hill,
            -3.0,
            -3.0,
            20.0,
            10.0,
            Blend::Additive,
            Easing::Linear,
        );
        assert!(g.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn amplitude_shrinks_the_pass_range() {
        let options = grid();
        let mut full = HeightfieldBuffer::for_options(&options);
        let mut quarter = HeightfieldBuffer::for_options(&options);
        multi_pass(
            &mut full,
            &options,
            &[Pass::generate(Generator::Perlin)],
            &mut ChaCha8Rng::seed_from_u64(3),
        );
        multi_pass(
            &mut quarter,
            &options,
            &[Pass::generate(Generator::Perlin).with_amplitude(0.25)],
            &mut ChaCha8Rng::seed_from_u64(3),
        );
        for (a, b) in full.as_slice().iter().zip(quarter.as_slice()) {
            assert!((a * 0.25 - b).abs() < 1e-9);
        }
    }

    #[test]
    fn shapes_vanish_or_flatten_at_the_rim() {
        assert!(InfluenceShape::Hill.evaluate(1.0, 0.0, 0.0).abs() < 1e-12);
        assert!(InfluenceShape::Dome.evaluate(1.0, 0.0, 0.0).abs() < 1e-12);
        assert_eq!(InfluenceShape::Hill.evaluate(0.0, 0.0, 0.0), 1.0);
        assert_eq!(InfluenceShape::Mesa.evaluate(0.0, 0.0, 0.0), 1.0);
    }
}
