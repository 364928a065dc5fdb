use crate::buffer::HeightfieldBuffer;

// Thermal weathering: material on slopes steeper than `talus` slides to the
// lowest 4-neighbour until the grid settles
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermalErosion {
    iterations: usize,
    // Largest height difference between neighbours that stays put
    talus: f64,
}

impl ThermalErosion {
    pub fn new(iterations: usize, talus: f64) -> Self {
        Self { iterations, talus }
    }

    pub fn apply(&self, g: &mut HeightfieldBuffer) {
        let (w, h) = (g.xl() as isize, g.yl() as isize);
        let mut delta = vec![0.0f64; g.len()];

        for _ in 0..self.iterations {
            // Deltas are gathered first so scan order does not bias the flow
            delta.fill(0.0);
            for y in 0..h {
                for x in 0..w {
                    let k = g.index(x as usize, y as usize);
                    let current = g.as_slice()[k];
                    let mut steepest = 0.0;
                    let mut target = None;
                    for (dx, dy) in [(1, 0), (0, 1), (-1, 0), (0, -1)] {
                        if let Some(n) = g.checked_index(x + dx, y + dy) {
                            let diff = current - g.as_slice()[n];
                            if diff > steepest {
                                steepest = diff;
                                target = Some(n);
                            }
                        }
                    }
                    if let Some(n) = target.filter(|_| steepest > self.talus) {
                        let amount = (steepest - self.talus) * 0.5;
                        delta[k] -= amount;
                        delta[n] += amount;
                    }
                }
            }
            for (v, d) in g.as_mut_slice().iter_mut().zip(&delta) {
                *v += d;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ThermalErosion;
    use crate::buffer::HeightfieldBuffer;

    #[test]
    fn peak_sheds_material() {
        let mut g = HeightfieldBuffer::new(2, 2);
        g.set(1, 1, 2.0);
        ThermalErosion::new(1, 1.0).apply(&mut g);
        assert!(g.get(1, 1) < 2.0);
        assert!(g.get(0, 1) > 0.0 || g.get(2, 1) > 0.0 || g.get(1, 0) > 0.0 || g.get(1, 2) > 0.0);
    }

    #[test]
    fn mass_is_conserved_and_runs_repeat() {
        let values: Vec<f64> = (0..25).map(|k| ((k * 7) % 11) as f64).collect();
        let mut a = HeightfieldBuffer::from_vec(4, 4, values.clone()).unwrap();
        let mut b = HeightfieldBuffer::from_vec(4, 4, values.clone()).unwrap();
        ThermalErosion::new(3, 0.5).apply(&mut a);
        ThermalErosion::new(3, 0.5).apply(&mut b);
        assert_eq!(a, b);
        let before: f64 = values.iter().sum();
        let after: f64 = a.as_slice().iter().sum();
        assert!((before - after).abs() < 1e-9);
    }
}
