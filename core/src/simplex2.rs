use rand_chacha::ChaCha8Rng;

use crate::NoiseGenerator;
use crate::perlin2::permutation_table;

// Approximate value of sqrt(3)
const SQRT_3: f64 = 1.732_050_807_568_877_2;
// Skews the square grid into a lattice of equilateral triangles
const F2: f64 = 0.5 * (SQRT_3 - 1.0);
// Reverses the skew
const G2: f64 = (3.0 - SQRT_3) / 6.0;

// 12 gradient directions, shared by every corner lookup
const GRAD3: [(f64, f64); 12] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

// 2D Simplex noise: triangles instead of squares, better isotropy than Perlin
pub struct Simplex2D {
    perm: [u8; 512],
}

impl Simplex2D {
    pub fn from_rng(rng: &mut ChaCha8Rng) -> Self {
        Self {
            perm: permutation_table(rng),
        }
    }

    // Contribution of one simplex corner at offset (x, y)
    #[inline]
    fn corner(gi: usize, x: f64, y: f64) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t <= 0.0 {
            return 0.0;
        }
        let (gx, gy) = GRAD3[gi];
        let t2 = t * t;
        t2 * t2 * (gx * x + gy * y)
    }

    // Single octave at (xin, yin), in [−1, 1]
    pub fn noise(&self, xin: f64, yin: f64) -> f64 {
        // Which skewed cell are we in
        let s = (xin + yin) * F2;
        let i = (xin + s).floor() as i64;
        let j = (yin + s).floor() as i64;

        // Unskew back to get the offset from the cell origin
        let t = (i + j) as f64 * G2;
        let x0 = xin - (i as f64 - t);
        let y0 = yin - (j as f64 - t);

        // Lower or upper triangle
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let gi0 = self.perm[ii + self.perm[jj] as usize] as usize % 12;
        let gi1 = self.perm[ii + i1 + self.perm[jj + j1] as usize] as usize % 12;
        let gi2 = self.perm[ii + 1 + self.perm[jj + 1] as usize] as usize % 12;

        // Scaled so the result spans roughly [-1, 1]
        70.0 * (Self::corner(gi0, x0, y0) + Self::corner(gi1, x1, y1) + Self::corner(gi2, x2, y2))
    }
}

impl NoiseGenerator for Simplex2D {
    fn get2(&self, x: f64, y: f64) -> f64 {
        self.noise(x, y)
    }
}
