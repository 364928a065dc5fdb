// Geometry derived from a heightfield: y-up triangle mesh, faces, bounds

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::buffer::HeightfieldBuffer;
use crate::error::TerrainError;
use crate::options::TerrainOptions;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: DVec3,
    pub b: DVec3,
    pub c: DVec3,
}

impl Triangle {
    pub fn new(a: DVec3, b: DVec3, c: DVec3) -> Self {
        Self { a, b, c }
    }

    // Unit normal following the counter-clockwise winding, zero for a sliver
    pub fn normal(&self) -> DVec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }

    pub fn centroid(&self) -> DVec3 {
        (self.a + self.b + self.c) / 3.0
    }

    pub fn area(&self) -> f64 {
        (self.b - self.a).cross(self.c - self.a).length() * 0.5
    }

    pub fn vertices(&self) -> [DVec3; 3] {
        [self.a, self.b, self.c]
    }
}

// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    // Inverted box that any union or point grows into a valid one
    pub const EMPTY: Aabb = Aabb {
        min: DVec3::splat(f64::INFINITY),
        max: DVec3::splat(f64::NEG_INFINITY),
    };

    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    pub fn from_points<I: IntoIterator<Item = DVec3>>(points: I) -> Self {
        points.into_iter().fold(Self::EMPTY, |b, p| b.include(p))
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn include(self, p: DVec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn union(self, other: Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}

// Indexed, y-up terrain surface. Vertex (i, j) sits at
// x = -x_size/2 + i·xw, z = -y_size/2 + j·yw, y = elevation
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMesh {
    x_segments: usize,
    y_segments: usize,
    positions: Vec<DVec3>,
    indices: Vec<[u32; 3]>,
}

impl TerrainMesh {
    pub fn from_heightfield(g: &HeightfieldBuffer, options: &TerrainOptions) -> Self {
        let (xl, yl) = (g.xl(), g.yl());
        let (xw, yw) = options.segment_size();
        let (x0, z0) = (-options.x_size * 0.5, -options.y_size * 0.5);

        let mut positions = Vec::with_capacity(g.len());
        for j in 0..yl {
            for i in 0..xl {
                positions.push(DVec3::new(x0 + i as f64 * xw, g.get(i, j), z0 + j as f64 * yw));
            }
        }

        let mut indices = Vec::with_capacity(g.x_segments() * g.y_segments() * 2);
        for j in 0..g.y_segments() {
            for i in 0..g.x_segments() {
                let a = (j * xl + i) as u32;
                let b = a + 1;
                let c = a + xl as u32;
                let d = c + 1;
                // Both windings give an upward normal
                indices.push([a, c, b]);
                indices.push([b, c, d]);
            }
        }

        Self {
            x_segments: g.x_segments(),
            y_segments: g.y_segments(),
            positions,
            indices,
        }
    }

    pub fn x_segments(&self) -> usize {
        self.x_segments
    }

    pub fn y_segments(&self) -> usize {
        self.y_segments
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn face_count(&self) -> usize {
        self.indices.len()
    }

    pub fn face(&self, k: usize) -> Triangle {
        let [a, b, c] = self.indices[k];
        Triangle::new(
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        )
    }

    pub fn faces(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.indices.len()).map(move |k| self.face(k))
    }

    // Non-indexed copy: three vertices per face
    pub fn to_triangles(&self) -> Vec<Triangle> {
        self.faces().collect()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().copied())
    }

    // Elevations back out of the vertex positions, row-major
    pub fn heights(&self) -> Result<HeightfieldBuffer, TerrainError> {
        let data = self.positions.iter().map(|p| p.y).collect();
        HeightfieldBuffer::from_vec(self.x_segments, self.y_segments, data)
    }
}
