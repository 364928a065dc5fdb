use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::NoiseGenerator;

// Classic 2D Perlin gradient noise
// The permutation table is drawn from the caller's RNG so a fixed seed
// reproduces the same field
pub struct Perlin2D {
    perm: [u8; 512], // permutation table (256 duplicated)
}

impl Perlin2D {
    pub fn from_rng(rng: &mut ChaCha8Rng) -> Self {
        Self {
            perm: permutation_table(rng),
        }
    }

    // Fade function as defined by Ken Perlin: 6t^5 − 15t^4 + 10t^3
    // First and second derivatives vanish at t=0 and t=1
    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + t * (b - a)
    }

    // Pick one of 8 gradient directions from the low bits of the hash
    // and dot it with the offset (x, y)
    #[inline]
    fn grad(hash: u8, x: f64, y: f64) -> f64 {
        let h = (hash & 0x7) as usize;
        let u = if h < 4 { x } else { y };
        let v = if h < 4 { y } else { x };
        let sign_u = if (h & 1) == 0 { u } else { -u };
        let sign_v = if (h & 2) == 0 { v } else { -v };
        sign_u + 0.5 * sign_v
    }

    #[inline]
    fn hash(&self, x: usize, y: usize) -> u8 {
        self.perm[self.perm[x & 255] as usize + (y & 255)]
    }

    // Single octave at (x, y), roughly in [−1, 1]
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        // Unit square containing the point
        let xi = x.floor() as i64 as usize;
        let yi = y.floor() as i64 as usize;
        // Position inside the square
        let xf = x - x.floor();
        let yf = y - y.floor();
        let u = Self::fade(xf);
        let v = Self::fade(yf);

        let aa = self.hash(xi, yi);
        let ab = self.hash(xi, yi.wrapping_add(1));
        let ba = self.hash(xi.wrapping_add(1), yi);
        let bb = self.hash(xi.wrapping_add(1), yi.wrapping_add(1));

        let x1 = Self::lerp(Self::grad(aa, xf, yf), Self::grad(ba, xf - 1.0, yf), u);
        let x2 = Self::lerp(
            Self::grad(ab, xf, yf - 1.0),
            Self::grad(bb, xf - 1.0, yf - 1.0),
            u,
        );
        Self::lerp(x1, x2, v)
    }
}

impl NoiseGenerator for Perlin2D {
    fn get2(&self, x: f64, y: f64) -> f64 {
        self.noise(x, y)
    }
}

// Shuffled 0..256, duplicated so lookups of `perm[a] + b` never need a modulo
pub(crate) fn permutation_table(rng: &mut ChaCha8Rng) -> [u8; 512] {
    let mut p: Vec<u8> = (0..=255u8).collect();
    p.shuffle(rng);
    let mut perm = [0u8; 512];
    for (i, slot) in perm.iter_mut().enumerate() {
        *slot = p[i & 255];
    }
    perm
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::Perlin2D;
    use crate::NoiseGenerator;

    #[test]
    fn perlin2_determinism() {
        let p1 = Perlin2D::from_rng(&mut ChaCha8Rng::seed_from_u64(1234));
        let p2 = Perlin2D::from_rng(&mut ChaCha8Rng::seed_from_u64(1234));
        let a = p1.get2(10.5, -3.7);
        let b = p2.get2(10.5, -3.7);
        assert_eq!(a, b);
    }

    #[test]
    fn perlin2_range() {
        let p = Perlin2D::from_rng(&mut ChaCha8Rng::seed_from_u64(0));
        for k in 0..2000 {
            let x = k as f64 * 0.173 - 40.0;
            let y = k as f64 * 0.091 + 3.3;
            let v = p.get2(x, y);
            assert!((-1.5..=1.5).contains(&v), "{v} out of range");
        }
    }

    #[test]
    fn perlin2_zero_on_lattice() {
        let p = Perlin2D::from_rng(&mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(p.get2(3.0, 5.0), 0.0);
    }
}
