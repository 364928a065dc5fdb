// Heightmap generators
// Every generator adds its output onto the buffer (`g[k] += delta`) so that
// MultiPass can stack any number of them

mod brownian;
mod diamond_square;
mod fault;
mod hill;
mod noise;
mod particles;
mod value;
mod weierstrass;
mod worley;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::buffer::HeightfieldBuffer;
use crate::compositor::{InfluenceShape, Pass, multi_pass};
use crate::filters::Filter;
use crate::options::TerrainOptions;

pub use brownian::brownian;
pub use diamond_square::diamond_square;
pub use fault::fault;
pub use hill::{hill, hill_island};
pub use noise::{coherent, cosine, curve, perlin, simplex};
pub use particles::particles;
pub use value::value;
pub use weierstrass::weierstrass;
pub use worley::{WorleyDistance, WorleyOptions, worley};

// Height as a function of normalized grid coordinates, used by `Generator::Curve`
pub type CurveFn = fn(f64, f64) -> f64;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Generator {
    Brownian,
    Cosine,
    // Not persistable: holds a function pointer
    #[serde(skip)]
    Curve(CurveFn),
    DiamondSquare,
    Fault,
    Hill(InfluenceShape),
    HillIsland(InfluenceShape),
    Particles,
    Perlin,
    // Perlin, then Diamond-Square at 0.75 amplitude, then a median smooth
    PerlinDiamond,
    PerlinLayers,
    Simplex,
    SimplexLayers,
    Value,
    Weierstrass,
    Worley(WorleyOptions),
    MultiPass(Vec<Pass>),
}

impl Generator {
    pub fn name(&self) -> &'static str {
        match self {
            Generator::Brownian => "Brownian",
            Generator::Cosine => "Cosine",
            Generator::Curve(_) => "Curve",
            Generator::DiamondSquare => "DiamondSquare",
            Generator::Fault => "Fault",
            Generator::Hill(_) => "Hill",
            Generator::HillIsland(_) => "HillIsland",
            Generator::Particles => "Particles",
            Generator::Perlin => "Perlin",
            Generator::PerlinDiamond => "PerlinDiamond",
            Generator::PerlinLayers => "PerlinLayers",
            Generator::Simplex => "Simplex",
            Generator::SimplexLayers => "SimplexLayers",
            Generator::Value => "Value",
            Generator::Weierstrass => "Weierstrass",
            Generator::Worley(_) => "Worley",
            Generator::MultiPass(_) => "MultiPass",
        }
    }

    // Run this generator over `g`, drawing all randomness from `rng`
    pub fn apply(&self, g: &mut HeightfieldBuffer, options: &TerrainOptions, rng: &mut ChaCha8Rng) {
        log::debug!(
            "{} pass on {}×{} grid, heights [{}, {}], frequency {}",
            self.name(),
            g.xl(),
            g.yl(),
            options.min_height,
            options.max_height,
            options.frequency
        );
        match self {
            Generator::Brownian => brownian(g, options, rng),
            Generator::Cosine => cosine(g, options, rng),
            Generator::Curve(f) => curve(g, options, *f),
            Generator::DiamondSquare => diamond_square(g, options, rng),
            Generator::Fault => fault(g, options, rng),
            Generator::Hill(shape) => hill(g, options, *shape, rng),
            Generator::HillIsland(shape) => hill_island(g, options, *shape, rng),
            Generator::Particles => particles(g, options, rng),
            Generator::Perlin => perlin(g, options, rng),
            Generator::PerlinDiamond => multi_pass(g, options, &perlin_diamond_passes(), rng),
            Generator::PerlinLayers => multi_pass(g, options, &perlin_layer_passes(), rng),
            Generator::Simplex => simplex(g, options, rng),
            Generator::SimplexLayers => multi_pass(g, options, &simplex_layer_passes(), rng),
            Generator::Value => value(g, options, rng),
            Generator::Weierstrass => weierstrass(g, options, rng),
            Generator::Worley(worley_options) => worley(g, options, worley_options, rng),
            Generator::MultiPass(passes) => multi_pass(g, options, passes, rng),
        }
    }
}

pub fn perlin_layer_passes() -> Vec<Pass> {
    vec![
        Pass::generate(Generator::Perlin).with_frequency(1.25),
        Pass::generate(Generator::Perlin).with_amplitude(0.05).with_frequency(2.5),
        Pass::generate(Generator::Perlin).with_amplitude(0.35).with_frequency(5.0),
        Pass::generate(Generator::Perlin).with_amplitude(0.15).with_frequency(10.0),
    ]
}

pub fn simplex_layer_passes() -> Vec<Pass> {
    vec![
        Pass::generate(Generator::Simplex).with_frequency(1.25),
        Pass::generate(Generator::Simplex).with_amplitude(0.5).with_frequency(2.5),
        Pass::generate(Generator::Simplex).with_amplitude(0.25).with_frequency(5.0),
        Pass::generate(Generator::Simplex).with_amplitude(0.125).with_frequency(10.0),
        Pass::generate(Generator::Simplex).with_amplitude(0.0625).with_frequency(20.0),
    ]
}

pub fn perlin_diamond_passes() -> Vec<Pass> {
    vec![
        Pass::generate(Generator::Perlin),
        Pass::generate(Generator::DiamondSquare).with_amplitude(0.75),
        Pass::filter(Filter::SmoothMedian),
    ]
}

// Uniform sample in [0, 1)
#[inline]
pub(crate) fn unit(rng: &mut ChaCha8Rng) -> f64 {
    rng.gen_range(0.0..1.0)
}

// Diagonal of the grid measured in segments
#[inline]
pub(crate) fn segment_diagonal(options: &TerrainOptions) -> f64 {
    let (x, y) = (options.x_segments as f64, options.y_segments as f64);
    (x * x + y * y).sqrt()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::Generator;
    use crate::buffer::HeightfieldBuffer;
    use crate::compositor::InfluenceShape;
    use crate::options::TerrainOptions;

    fn small_options() -> TerrainOptions {
        TerrainOptions {
            x_segments: 31,
            y_segments: 23,
            x_size: 512.0,
            y_size: 384.0,
            ..TerrainOptions::default()
        }
    }

    fn every_generator() -> Vec<Generator> {
        vec![
            Generator::Brownian,
            Generator::Cosine,
            Generator::Curve(|x, y| (x * 3.0).sin() * (y * 2.0).cos()),
            Generator::DiamondSquare,
            Generator::Fault,
            Generator::Hill(InfluenceShape::Hill),
            Generator::HillIsland(InfluenceShape::Volcano),
            Generator::Particles,
            Generator::Perlin,
            Generator::PerlinDiamond,
            Generator::PerlinLayers,
            Generator::Simplex,
            Generator::SimplexLayers,
            Generator::Value,
            Generator::Weierstrass,
            Generator::Worley(Default::default()),
        ]
    }

    #[test]
    fn every_generator_is_finite_and_not_flat() {
        let options = small_options();
        for generator in every_generator() {
            let mut g = HeightfieldBuffer::for_options(&options);
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            generator.apply(&mut g, &options, &mut rng);
            g.assert_finite();
            let (lo, hi) = g.min_max();
            assert!(hi > lo, "{} produced a flat field", generator.name());
        }
    }

    #[test]
    fn every_generator_is_deterministic() {
        let options = small_options();
        for generator in every_generator() {
            let mut a = HeightfieldBuffer::for_options(&options);
            let mut b = HeightfieldBuffer::for_options(&options);
            generator.apply(&mut a, &options, &mut ChaCha8Rng::seed_from_u64(9));
            generator.apply(&mut b, &options, &mut ChaCha8Rng::seed_from_u64(9));
            assert_eq!(a, b, "{} is not reproducible", generator.name());
        }
    }
}
