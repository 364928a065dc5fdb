use serde::{Deserialize, Serialize};

use super::clamp;
use crate::buffer::HeightfieldBuffer;
use crate::easing::Easing;
use crate::options::TerrainOptions;

// Which way the border is pushed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeDirection {
    // Raise towards max_height: cliffs, canyon walls
    Up,
    // Lower towards min_height: islands
    #[default]
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSides {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for EdgeSides {
    fn default() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeOptions {
    pub direction: EdgeDirection,
    // Width of the affected band in world units
    pub distance: f64,
    pub easing: Easing,
    pub sides: EdgeSides,
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            direction: EdgeDirection::Down,
            distance: 64.0,
            easing: Easing::EaseInOut,
            sides: EdgeSides::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadialEdgeOptions {
    pub direction: EdgeDirection,
    // Width of the band inside the inscribed circle, world units
    pub distance: f64,
    pub easing: Easing,
}

impl Default for RadialEdgeOptions {
    fn default() -> Self {
        Self {
            direction: EdgeDirection::Down,
            distance: 64.0,
            easing: Easing::EaseInOut,
        }
    }
}

// Blend `v` towards `peak` by `multiplier`, never moving it against `direction`
#[inline]
fn push(v: f64, peak: f64, multiplier: f64, direction: EdgeDirection) -> f64 {
    let target = (peak - v) * multiplier + v;
    match direction {
        EdgeDirection::Up => v.max(target),
        EdgeDirection::Down => v.min(target),
    }
}

#[inline]
fn peak(options: &TerrainOptions, direction: EdgeDirection) -> f64 {
    match direction {
        EdgeDirection::Up => options.max_height,
        EdgeDirection::Down => options.min_height,
    }
}

// Force a band along the rectangular border towards the min or max height,
// fully at the border and fading inwards through `easing`
pub fn edges(g: &mut HeightfieldBuffer, options: &TerrainOptions, edge: &EdgeOptions) {
    let (xw, yw) = options.segment_size();
    let (xl, yl) = (g.xl(), g.yl());
    let band_x = ((edge.distance / xw).floor() as usize).max(1).min(xl);
    let band_y = ((edge.distance / yw).floor() as usize).max(1).min(yl);
    let peak = peak(options, edge.direction);
    let (last_i, last_j) = (xl - 1, yl - 1);

    for i in 0..xl {
        for j in 0..band_y {
            let multiplier = edge.easing.apply(1.0 - j as f64 / band_y as f64);
            if edge.sides.top {
                let k = g.index(i, j);
                g.as_mut_slice()[k] = push(g.as_slice()[k], peak, multiplier, edge.direction);
            }
            if edge.sides.bottom {
                let k = g.index(i, last_j - j);
                g.as_mut_slice()[k] = push(g.as_slice()[k], peak, multiplier, edge.direction);
            }
        }
    }
    for j in 0..yl {
        for i in 0..band_x {
            let multiplier = edge.easing.apply(1.0 - i as f64 / band_x as f64);
            if edge.sides.left {
                let k = g.index(i, j);
                g.as_mut_slice()[k] = push(g.as_slice()[k], peak, multiplier, edge.direction);
            }
            if edge.sides.right {
                let k = g.index(last_i - i, j);
                g.as_mut_slice()[k] = push(g.as_slice()[k], peak, multiplier, edge.direction);
            }
        }
    }

    clamp(
        g,
        &TerrainOptions {
            stretch: true,
            easing: Easing::Linear,
            ..options.clone()
        },
    );
}

// Circular variant: everything beyond the inscribed circle shrunk by
// `distance` is pushed towards the peak, fully so at the circle's rim
pub fn radial_edges(g: &mut HeightfieldBuffer, options: &TerrainOptions, edge: &RadialEdgeOptions) {
    let (xw, yw) = options.segment_size();
    let (cx, cy) = (options.x_size * 0.5, options.y_size * 0.5);
    let outer = cx.min(cy);
    let edge_radius = (outer - edge.distance).max(0.0);
    let band = (outer - edge_radius).max(f64::EPSILON);
    let peak = peak(options, edge.direction);

    for j in 0..g.yl() {
        for i in 0..g.xl() {
            let dx = i as f64 * xw - cx;
            let dy = j as f64 * yw - cy;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance <= edge_radius {
                continue;
            }
            let t = ((distance - edge_radius) / band).min(1.0);
            let multiplier = edge.easing.apply(t);
            let k = g.index(i, j);
            g.as_mut_slice()[k] = push(g.as_slice()[k], peak, multiplier, edge.direction);
        }
    }
}
