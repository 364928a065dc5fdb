use crate::buffer::HeightfieldBuffer;

// One terrace: the cells it owns and their mean elevation
#[derive(Clone, Debug, PartialEq)]
pub struct StepBucket {
    pub members: Vec<usize>,
    pub mean: f64,
}

// Terrace count used when none is configured: (n / 2)^(1/4)
pub fn default_step_levels(len: usize) -> usize {
    ((len as f64 * 0.5).powf(0.25).floor() as usize).max(1)
}

// Split cells into `levels` equal-population buckets by elevation (sorted,
// then sliced into equal counts; the last bucket takes the remainder)
pub fn step_buckets(values: &[f64], levels: usize) -> Vec<StepBucket> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let levels = levels.clamp(1, n);
    let mut order: Vec<usize> = (0..n).collect();
    // Stable sort so equal heights keep index order
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let per_bucket = n / levels;
    (0..levels)
        .map(|b| {
            let start = b * per_bucket;
            let end = if b + 1 == levels { n } else { start + per_bucket };
            let members = order[start..end].to_vec();
            let mean = members.iter().map(|&k| values[k]).sum::<f64>() / members.len() as f64;
            StepBucket { members, mean }
        })
        .collect()
}

// Quantize into terraces: every cell takes the mean of its bucket
pub fn step(g: &mut HeightfieldBuffer, levels: usize) {
    let buckets = step_buckets(g.as_slice(), levels);
    let cells = g.as_mut_slice();
    for bucket in &buckets {
        for &k in &bucket.members {
            cells[k] = bucket.mean;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::{default_step_levels, step, step_buckets};
    use crate::buffer::HeightfieldBuffer;

    #[test]
    fn four_levels_over_a_hundred_cells() {
        let mut rng = ChaCha8Rng::seed_from_u64(100);
        let values: Vec<f64> = (0..100).map(|_| rng.gen_range(0.0..50.0)).collect();
        let buckets = step_buckets(&values, 4);
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets.iter().map(|b| b.members.len()).sum::<usize>(), 100);
        assert!(buckets.iter().all(|b| b.members.len() == 25));

        // 100 cells = 10 × 10 vertices
        let mut g = HeightfieldBuffer::from_vec(9, 9, values.clone()).unwrap();
        step(&mut g, 4);
        for bucket in &buckets {
            let expected = bucket.members.iter().map(|&k| values[k]).sum::<f64>() / 25.0;
            for &k in &bucket.members {
                assert_eq!(g.as_slice()[k], expected);
            }
        }
        let mut distinct: Vec<f64> = g.as_slice().to_vec();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn buckets_are_ordered_by_height() {
        let values: Vec<f64> = (0..10).rev().map(|v| v as f64).collect();
        let buckets = step_buckets(&values, 3);
        assert_eq!(buckets[2].members.len(), 4);
        assert!(buckets[0].mean < buckets[1].mean && buckets[1].mean < buckets[2].mean);
    }

    #[test]
    fn default_levels() {
        assert_eq!(default_step_levels(2 * 4096), 8);
        assert_eq!(default_step_levels(1), 1);
    }
}
