use std::f64::consts::PI;

use rand_chacha::ChaCha8Rng;

use super::unit;
use crate::buffer::HeightfieldBuffer;
use crate::options::TerrainOptions;

// Steps the walker may take looking for an unvisited vertex before it jumps
// to a remembered one
const MAX_WALK_ATTEMPTS: usize = 9;

// Brownian surface: a self-avoiding random walk over every vertex. Each
// vertex gets the mean of its already-visited neighbours plus a slowly
// drifting random offset.
//
// Every loop iteration visits exactly one new vertex, so the walk ends after
// `len - 1` iterations no matter how often the walker gets boxed in
pub fn brownian(g: &mut HeightfieldBuffer, options: &TerrainOptions, rng: &mut ChaCha8Rng) {
    let n = g.len();
    let (xl, yl) = (g.xl(), g.yl());
    let range = options.height_range();
    let smaller_side = options.x_size.min(options.y_size);
    let change_direction_probability = smaller_side.sqrt() / smaller_side;
    let max_adjust = range.max(0.0).sqrt();

    let mut field = vec![0.0f64; n];
    let mut visited = vec![false; n];
    // Untouched neighbours of visited vertices, candidates for a restart
    let mut frontier: Vec<usize> = Vec::new();
    // Every vertex below this index has been visited
    let mut scan_from = 0usize;

    let mut x = (unit(rng) * options.x_segments as f64).floor();
    let mut y = (unit(rng) * options.y_segments as f64).floor();
    let mut current = g.index(x as usize, y as usize);
    field[current] = unit(rng) * range + options.min_height;
    visited[current] = true;
    let mut visited_count = 1;

    let mut heading = unit(rng) * PI * 2.0;
    let mut offset = 0.0f64;
    let mut fallbacks = 0usize;

    while visited_count < n {
        let (ci, cj) = ((current % xl) as isize, (current / xl) as isize);
        for k in neighbours(g, ci, cj) {
            if !visited[k] {
                frontier.push(k);
            }
        }

        let mut next = None;
        for _ in 0..MAX_WALK_ATTEMPTS {
            if unit(rng) < change_direction_probability {
                heading = unit(rng) * PI * 2.0;
            }
            x += heading.cos();
            y += heading.sin();
            // Bounce off the borders instead of wandering away
            if x < 0.0 || x > options.x_segments as f64 {
                x = x.clamp(0.0, options.x_segments as f64);
                heading = PI - heading;
            }
            if y < 0.0 || y > options.y_segments as f64 {
                y = y.clamp(0.0, options.y_segments as f64);
                heading = -heading;
            }
            if let Some(k) = g.checked_index(x.round() as isize, y.round() as isize) {
                if !visited[k] {
                    next = Some(k);
                    break;
                }
            }
        }

        let next = match next {
            Some(k) => k,
            None => {
                fallbacks += 1;
                let k = restart_vertex(&mut frontier, &visited, &mut scan_from);
                x = (k % xl) as f64;
                y = (k / xl) as f64;
                k
            }
        };

        let (ni, nj) = ((next % xl) as isize, (next / xl) as isize);
        let (sum, count) = neighbours(g, ni, nj)
            .filter(|&k| visited[k])
            .fold((0.0, 0usize), |(s, c), k| (s + field[k], c + 1));
        let base = if count > 0 {
            sum / count as f64
        } else {
            field[current]
        };
        offset = (offset + (unit(rng) * 2.0 - 1.0) * max_adjust * 0.2).clamp(-max_adjust, max_adjust);

        field[next] = base + offset;
        visited[next] = true;
        visited_count += 1;
        current = next;
    }

    if fallbacks > 0 {
        log::trace!("brownian walk restarted {fallbacks} times over {xl}×{yl} vertices");
    }

    for (v, f) in g.as_mut_slice().iter_mut().zip(&field) {
        *v += f;
    }
}

fn neighbours(g: &HeightfieldBuffer, i: isize, j: isize) -> impl Iterator<Item = usize> + '_ {
    (-1..=1isize)
        .flat_map(move |n| (-1..=1isize).map(move |m| (m, n)))
        .filter(|&(m, n)| m != 0 || n != 0)
        .filter_map(move |(m, n)| g.checked_index(i + m, j + n))
}

// Prefer a remembered frontier vertex; otherwise take the first unvisited
// vertex in index order. Only called while at least one vertex is unvisited
fn restart_vertex(frontier: &mut Vec<usize>, visited: &[bool], scan_from: &mut usize) -> usize {
    while let Some(k) = frontier.pop() {
        if !visited[k] {
            return k;
        }
    }
    while visited[*scan_from] {
        *scan_from += 1;
    }
    *scan_from
}
