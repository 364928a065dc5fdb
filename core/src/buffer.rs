use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::options::TerrainOptions;

// Flat row-major elevation grid of (x_segments + 1) × (y_segments + 1) vertices
// Vertex (i, j) lives at `j * xl + i` where `xl = x_segments + 1`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightfieldBuffer {
    x_segments: usize,
    y_segments: usize,
    data: Vec<f64>,
}

impl HeightfieldBuffer {
    // All-zero grid, ready for additive generators
    pub fn new(x_segments: usize, y_segments: usize) -> Self {
        Self {
            x_segments,
            y_segments,
            data: vec![0.0; (x_segments + 1) * (y_segments + 1)],
        }
    }

    pub fn for_options(options: &TerrainOptions) -> Self {
        Self::new(options.x_segments, options.y_segments)
    }

    // Wrap an existing row-major vector, checking its length against the grid
    pub fn from_vec(x_segments: usize, y_segments: usize, data: Vec<f64>) -> Result<Self, TerrainError> {
        let expected = (x_segments + 1) * (y_segments + 1);
        if data.len() != expected {
            return Err(TerrainError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            x_segments,
            y_segments,
            data,
        })
    }

    #[inline]
    pub fn x_segments(&self) -> usize {
        self.x_segments
    }

    #[inline]
    pub fn y_segments(&self) -> usize {
        self.y_segments
    }

    // Vertices per row
    #[inline]
    pub fn xl(&self) -> usize {
        self.x_segments + 1
    }

    // Number of rows
    #[inline]
    pub fn yl(&self) -> usize {
        self.y_segments + 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.xl() && j < self.yl(), "({i}, {j}) outside grid");
        j * self.xl() + i
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.index(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let k = self.index(i, j);
        self.data[k] = value;
    }

    #[inline]
    pub fn add(&mut self, i: usize, j: usize, delta: f64) {
        let k = self.index(i, j);
        self.data[k] += delta;
    }

    // Signed lookup, None outside the grid
    #[inline]
    pub fn checked_index(&self, i: isize, j: isize) -> Option<usize> {
        if i < 0 || j < 0 || i >= self.xl() as isize || j >= self.yl() as isize {
            return None;
        }
        Some(j as usize * self.xl() + i as usize)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    // Smallest and largest elevation, (inf, -inf) for an empty grid
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    // Values of the 3×3 neighbourhood around (i, j) that fall inside the grid
    pub fn neighborhood(&self, i: usize, j: usize, include_center: bool) -> impl Iterator<Item = f64> + '_ {
        let (i, j) = (i as isize, j as isize);
        (-1..=1isize)
            .flat_map(move |n| (-1..=1isize).map(move |m| (m, n)))
            .filter(move |&(m, n)| include_center || m != 0 || n != 0)
            .filter_map(move |(m, n)| self.checked_index(i + m, j + n))
            .map(move |k| self.data[k])
    }

    // Fail fast on NaN / infinity: a generator produced garbage
    pub fn assert_finite(&self) {
        if let Some(k) = self.data.iter().position(|v| !v.is_finite()) {
            panic!(
                "non-finite elevation {} at index {} (i = {}, j = {})",
                self.data[k],
                k,
                k % self.xl(),
                k / self.xl()
            );
        }
    }
}
