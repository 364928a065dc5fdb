use glam::DVec3;
use terrain_core::{Aabb, Triangle};

const EPSILON: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    // Unit length
    pub direction: DVec3,
}

impl Ray {
    // None for a zero direction
    pub fn new(origin: DVec3, direction: DVec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

// Möller–Trumbore; double sided. Returns the distance along the ray
pub fn intersect_triangle(ray: &Ray, tri: &Triangle) -> Option<f64> {
    let e1 = tri.b - tri.a;
    let e2 = tri.c - tri.a;
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - tri.a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

// Slab test: does the ray enter `bounds` before `max_distance`?
pub fn intersects_aabb(ray: &Ray, bounds: &Aabb, max_distance: f64) -> bool {
    if bounds.is_empty() {
        return false;
    }
    let (mut near, mut far) = (0.0f64, max_distance);
    for axis in 0..3 {
        let (o, d) = (ray.origin[axis], ray.direction[axis]);
        let (lo, hi) = (bounds.min[axis], bounds.max[axis]);
        if d.abs() < EPSILON {
            if o < lo || o > hi {
                return false;
            }
            continue;
        }
        let (mut t0, mut t1) = ((lo - o) / d, (hi - o) / d);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        near = near.max(t0);
        far = far.min(t1);
        if near > far {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use terrain_core::{Aabb, Triangle};

    use super::{Ray, intersect_triangle, intersects_aabb};

    fn floor() -> Triangle {
        Triangle::new(
            DVec3::new(-1.0, 0.0, -1.0),
            DVec3::new(-1.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, -1.0),
        )
    }

    #[test]
    fn ray_hits_from_either_side() {
        let down = Ray::new(DVec3::new(-0.5, 2.0, -0.5), -DVec3::Y).unwrap();
        assert!((intersect_triangle(&down, &floor()).unwrap() - 2.0).abs() < 1e-12);
        let up = Ray::new(DVec3::new(-0.5, -3.0, -0.5), DVec3::Y).unwrap();
        assert!((intersect_triangle(&up, &floor()).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn ray_misses_outside_parallel_and_behind() {
        let outside = Ray::new(DVec3::new(0.9, 2.0, 0.9), -DVec3::Y).unwrap();
        assert!(intersect_triangle(&outside, &floor()).is_none());
        let parallel = Ray::new(DVec3::new(-2.0, 0.0, -0.5), DVec3::X).unwrap();
        assert!(intersect_triangle(&parallel, &floor()).is_none());
        let away = Ray::new(DVec3::new(-0.5, 2.0, -0.5), DVec3::Y).unwrap();
        assert!(intersect_triangle(&away, &floor()).is_none());
        assert!(Ray::new(DVec3::ZERO, DVec3::ZERO).is_none());
    }

    #[test]
    fn slab_test_respects_distance() {
        let bounds = Aabb::new(DVec3::splat(-1.0), DVec3::splat(1.0));
        let ray = Ray::new(DVec3::new(-5.0, 0.0, 0.0), DVec3::X).unwrap();
        assert!(intersects_aabb(&ray, &bounds, 10.0));
        assert!(!intersects_aabb(&ray, &bounds, 3.0));
        let beside = Ray::new(DVec3::new(-5.0, 2.0, 0.0), DVec3::X).unwrap();
        assert!(!intersects_aabb(&beside, &bounds, 100.0));
        let flat = Aabb::new(DVec3::new(-1.0, 0.0, -1.0), DVec3::new(1.0, 0.0, 1.0));
        let down = Ray::new(DVec3::new(0.0, 1.0, 0.0), -DVec3::Y).unwrap();
        assert!(intersects_aabb(&down, &flat, 2.0));
    }
}
