use serde::{Deserialize, Serialize};

pub const SPEED_OF_SOUND: f64 = 343.0;
// Sea-level air density, kg/m³
pub const AIR_DENSITY: f64 = 1.225;

// Empirical drag coefficient curve over Mach number:
// Cd(M) = a·e^(-b·M) + c / (1 + d·(M - mp)²) + e / (M^f + g)
// The middle term is the transonic bump centered on `mp`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragModel {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub mp: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
    pub air_density: f64,
    pub speed_of_sound: f64,
}

impl Default for DragModel {
    fn default() -> Self {
        Self {
            a: 0.1,
            b: 1.0,
            c: 0.25,
            d: 20.0,
            mp: 1.0,
            e: 0.2,
            f: 2.0,
            g: 1.5,
            air_density: AIR_DENSITY,
            speed_of_sound: SPEED_OF_SOUND,
        }
    }
}

impl DragModel {
    pub fn coefficient(&self, mach: f64) -> f64 {
        let m = mach.max(0.0);
        self.a * (-self.b * m).exp()
            + self.c / (1.0 + self.d * (m - self.mp).powi(2))
            + self.e / (m.powf(self.f) + self.g)
    }

    // Magnitude of the drag deceleration (m/s²) on a body of `area` m² and
    // `mass` kg moving at `speed` m/s
    pub fn deceleration(&self, speed: f64, area: f64, mass: f64) -> f64 {
        if mass <= 0.0 || speed <= 0.0 {
            return 0.0;
        }
        let cd = self.coefficient(speed / self.speed_of_sound);
        0.5 * self.air_density * cd * area / mass * speed * speed
    }
}

#[cfg(test)]
mod tests {
    use super::DragModel;

    #[test]
    fn coefficient_peaks_near_mach_one() {
        let drag = DragModel::default();
        let transonic = drag.coefficient(1.0);
        assert!(transonic > drag.coefficient(0.5));
        assert!(transonic > drag.coefficient(2.0));
        assert!(drag.coefficient(0.0) > 0.0);
        // Negative speeds never leave the curve's domain
        assert_eq!(drag.coefficient(-1.0), drag.coefficient(0.0));
    }

    #[test]
    fn deceleration_grows_with_speed() {
        let drag = DragModel::default();
        let area = std::f64::consts::PI * 0.004f64.powi(2);
        assert!(drag.deceleration(800.0, area, 0.01) > drag.deceleration(100.0, area, 0.01));
        assert_eq!(drag.deceleration(0.0, area, 0.01), 0.0);
        assert_eq!(drag.deceleration(100.0, area, 0.0), 0.0);
    }
}
