use serde::{Deserialize, Serialize};

// Monotonic curves mapping [0, 1] onto [0, 1]
// Used by Clamp, the edge filters, influences and smooth scatter spread
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    // Slow start, fast finish
    EaseIn,
    // Fast start, slow finish
    EaseOut,
    // Smoothstep: slow at both ends
    EaseInOut,
    // Fast at both ends, flat in the middle
    InEaseOut,
    EaseInWeak,
    EaseInStrong,
}

impl Easing {
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Easing::Linear => x,
            Easing::EaseIn => x * x,
            Easing::EaseOut => -x * (x - 2.0),
            Easing::EaseInOut => x * x * (3.0 - 2.0 * x),
            Easing::InEaseOut => {
                let y = 2.0 * x - 1.0;
                0.5 * y * y * y + 0.5
            }
            Easing::EaseInWeak => x.powf(1.55),
            Easing::EaseInStrong => x.powi(7),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Easing;

    const ALL: [Easing; 7] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::InEaseOut,
        Easing::EaseInWeak,
        Easing::EaseInStrong,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-12, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-12, "{e:?} at 1");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for e in ALL {
            let mut last = e.apply(0.0);
            for k in 1..=100 {
                let v = e.apply(k as f64 / 100.0);
                assert!(v + 1e-12 >= last, "{e:?} decreases at {k}");
                last = v;
            }
        }
    }
}
