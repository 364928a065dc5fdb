use crate::buffer::HeightfieldBuffer;

// Evaluate `f` over each cell's 3×3 neighbourhood into a scratch grid, then
// copy back so every cell sees the unfiltered values
fn neighbourhood_filter<F>(g: &mut HeightfieldBuffer, include_center: bool, mut f: F)
where
    F: FnMut(f64, &mut Vec<f64>) -> f64,
{
    let mut out = vec![0.0f64; g.len()];
    let mut scratch = Vec::with_capacity(9);
    for j in 0..g.yl() {
        for i in 0..g.xl() {
            scratch.clear();
            scratch.extend(g.neighborhood(i, j, include_center));
            out[g.index(i, j)] = f(g.get(i, j), &mut scratch);
        }
    }
    g.as_mut_slice().copy_from_slice(&out);
}

// Mean of the 3×3 neighbourhood; `weight` keeps part of the original value:
// `(mean + v * weight) / (1 + weight)`
pub fn smooth(g: &mut HeightfieldBuffer, weight: f64) {
    let w = 1.0 / (1.0 + weight);
    neighbourhood_filter(g, true, |v, cells| {
        let mean = cells.iter().sum::<f64>() / cells.len() as f64;
        (mean + v * weight) * w
    });
}

// Median of the 3×3 neighbourhood, averaging the two middle values when the
// neighbourhood (clipped at the border) has an even count
pub fn smooth_median(g: &mut HeightfieldBuffer) {
    neighbourhood_filter(g, true, |_, cells| {
        cells.sort_by(f64::total_cmp);
        let n = cells.len();
        if n % 2 == 0 {
            (cells[n / 2 - 1] + cells[n / 2]) * 0.5
        } else {
            cells[n / 2]
        }
    });
}

// Keep each cell within `multiplier` times the half-range of its neighbours,
// centered on their midpoint. Removes single-cell spikes and pits while
// leaving smooth slopes untouched
pub fn smooth_conservative(g: &mut HeightfieldBuffer, multiplier: f64) {
    neighbourhood_filter(g, false, |v, cells| {
        if cells.is_empty() {
            return v;
        }
        let (lo, hi) = cells
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| (lo.min(c), hi.max(c)));
        let mid = (lo + hi) * 0.5;
        let half = (hi - lo) * 0.5 * multiplier;
        v.clamp(mid - half, mid + half)
    });
}

#[cfg(test)]
mod tests {
    use super::{smooth, smooth_conservative, smooth_median};
    use crate::buffer::HeightfieldBuffer;

    fn spike() -> HeightfieldBuffer {
        let mut g = HeightfieldBuffer::new(4, 4);
        g.set(2, 2, 9.0);
        g
    }

    #[test]
    fn mean_spreads_a_spike() {
        let mut g = spike();
        smooth(&mut g, 0.0);
        assert!((g.get(2, 2) - 1.0).abs() < 1e-12);
        assert!((g.get(1, 1) - 1.0).abs() < 1e-12);
        assert_eq!(g.get(0, 0), 0.0);
    }

    #[test]
    fn weight_retains_original() {
        let mut g = spike();
        smooth(&mut g, 1.0);
        // (1 + 9) / 2
        assert!((g.get(2, 2) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn median_removes_a_spike() {
        let mut g = spike();
        smooth_median(&mut g);
        assert!(g.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn median_averages_even_counts() {
        // Corner (0, 0) sees 4 cells: 1, 2, 4, 5
        let mut g = HeightfieldBuffer::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
        smooth_median(&mut g);
        assert_eq!(g.get(0, 0), 3.0);
    }

    #[test]
    fn conservative_clips_spikes_but_keeps_ramps() {
        let mut g = spike();
        smooth_conservative(&mut g, 1.0);
        assert_eq!(g.get(2, 2), 0.0);

        let ramp: Vec<f64> = (0..25).map(|k| (k % 5) as f64).collect();
        let mut r = HeightfieldBuffer::from_vec(4, 4, ramp.clone()).unwrap();
        smooth_conservative(&mut r, 1.0);
        assert_eq!(r.as_slice(), ramp.as_slice());
    }
}
