// Deflect-or-impact decision for a projectile that reached a surface

use glam::DVec3;

use crate::hittable::RayHit;

// Subtracted from sin(angle)^4; near-normal hits end up below zero and
// therefore never deflect
pub const DEFLECTION_BIAS: f64 = 0.3;
// Share of the speed kept after a deflection
pub const DEFLECTED_SPEED: f64 = 0.2;
// Distance a deflected projectile is moved off the surface, m
pub const SURFACE_NUDGE: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Deflect { position: DVec3, velocity: DVec3 },
    Impact,
}

// Angle between the velocity and the surface normal, radians. Both 0 and π
// mean a head-on hit, π/2 a graze
pub fn incidence_angle(velocity: DVec3, normal: DVec3) -> f64 {
    velocity.angle_between(normal)
}

pub fn deflection_probability(angle: f64) -> f64 {
    angle.sin().powi(4) - DEFLECTION_BIAS
}

// `roll` is uniform in [0, 1)
pub fn resolve(velocity: DVec3, hit: &RayHit, roll: f64) -> Outcome {
    let probability = deflection_probability(incidence_angle(velocity, hit.normal));
    if roll >= probability {
        return Outcome::Impact;
    }
    let n = hit.normal.normalize_or_zero();
    let reflected = velocity - 2.0 * velocity.dot(n) * n;
    let velocity = reflected * DEFLECTED_SPEED;
    Outcome::Deflect {
        position: hit.point + velocity.normalize_or_zero() * SURFACE_NUDGE,
        velocity,
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use glam::DVec3;

    use super::{Outcome, deflection_probability, incidence_angle, resolve};
    use crate::hittable::{HittableId, RayHit};

    fn hit() -> RayHit {
        RayHit {
            node: HittableId(0),
            point: DVec3::new(10.0, 0.0, 0.0),
            normal: -DVec3::X,
            distance: 10.0,
        }
    }

    #[test]
    fn probability_ranges_from_graze_to_head_on() {
        assert!((deflection_probability(FRAC_PI_2) - 0.7).abs() < 1e-12);
        assert!((deflection_probability(0.0) + 0.3).abs() < 1e-12);
        assert!(deflection_probability(std::f64::consts::PI) < 0.0);
    }

    #[test]
    fn head_on_hits_always_impact() {
        let velocity = DVec3::new(100.0, 0.0, 0.0);
        assert!((incidence_angle(velocity, -DVec3::X) - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(resolve(velocity, &hit(), 0.0), Outcome::Impact);
    }

    #[test]
    fn grazing_deflection_reflects_and_slows() {
        let velocity = DVec3::new(10.0, 0.0, 100.0);
        match resolve(velocity, &hit(), 0.1) {
            Outcome::Deflect { position, velocity: out } => {
                assert!((out - DVec3::new(-2.0, 0.0, 20.0)).length() < 1e-9);
                assert!(position.x < 10.0);
                assert!(((position - hit().point).length() - 0.05).abs() < 1e-12);
            }
            Outcome::Impact => panic!("a graze with a low roll deflects"),
        }
        assert_eq!(resolve(velocity, &hit(), 0.99), Outcome::Impact);
    }
}
