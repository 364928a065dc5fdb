use rand_chacha::ChaCha8Rng;

use super::unit;
use crate::buffer::HeightfieldBuffer;
use crate::filters::clamp;
use crate::options::TerrainOptions;

const TERMS: usize = 20;

// Per-run coefficients of one axis of the series
struct Axis {
    decay_base: f64,
    decay_rate: f64,
    growth_base: f64,
    growth_rate: f64,
    skew: f64,
    direction: f64,
}

impl Axis {
    fn random(rng: &mut ChaCha8Rng) -> Self {
        Self {
            decay_base: 0.5 + unit(rng),
            decay_rate: 0.5 + unit(rng),
            growth_base: 0.025 + unit(rng) * 0.1,
            growth_rate: 0.5 + unit(rng),
            skew: unit(rng) * 0.5,
            direction: if unit(rng) < 0.5 { 1.0 } else { -1.0 },
        }
    }

    // k-th term of a Weierstrass-style series along `along`, wobbled by `across`
    #[inline]
    fn term(&self, k: usize, along: f64, across: f64) -> f64 {
        let k = k as f64;
        (1.0 + self.decay_base).powf(-self.decay_rate * k)
            * ((1.0 + self.growth_base).powf(self.growth_rate * k)
                * (along + 0.25 * across.cos() + self.skew * across)
                * self.direction)
                .sin()
    }
}

// Weierstrass-like fractal: continuous everywhere, differentiable nowhere,
// visibly repetitive. Rescaled into the height range afterwards
pub fn weierstrass(g: &mut HeightfieldBuffer, options: &TerrainOptions, rng: &mut ChaCha8Rng) {
    let ax = Axis::random(rng);
    let ay = Axis::random(rng);
    let amplitude = options.height_range() * 0.5 / TERMS as f64;

    for j in 0..g.yl() {
        for i in 0..g.xl() {
            let (fi, fj) = (i as f64, j as f64);
            let mut sum = 0.0;
            for k in 0..TERMS {
                let x = ax.term(k, fi, fj);
                let y = ay.term(k, fj, fi);
                sum -= (ax.direction * x * x + ay.direction * y * y).exp();
            }
            g.add(i, j, sum * amplitude);
        }
    }
    clamp(g, options);
}
