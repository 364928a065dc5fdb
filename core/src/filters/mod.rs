// Post-processing passes that mutate a heightfield in place

mod blur;
mod clamp;
mod edges;
mod erosion;
mod smooth;
mod step;

use serde::{Deserialize, Serialize};

use crate::buffer::HeightfieldBuffer;
use crate::options::TerrainOptions;

pub use blur::{boxes_for_gauss, gaussian_box_blur};
pub use clamp::clamp;
pub use edges::{EdgeDirection, EdgeOptions, EdgeSides, RadialEdgeOptions, edges, radial_edges};
pub use erosion::ThermalErosion;
pub use smooth::{smooth, smooth_conservative, smooth_median};
pub use step::{StepBucket, default_step_levels, step, step_buckets};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    // Rescale into [min_height, max_height] through the options' easing
    Clamp,
    Edges(EdgeOptions),
    RadialEdges(RadialEdgeOptions),
    // 3×3 mean; `weight` is how much of the original value is retained
    Smooth { weight: f64 },
    SmoothMedian,
    SmoothConservative { multiplier: f64 },
    Step { levels: usize },
    Turbulence,
    GaussianBoxBlur { sigma: f64, passes: usize },
    ThermalErosion { iterations: usize, talus: f64 },
}

impl Filter {
    pub fn apply(&self, g: &mut HeightfieldBuffer, options: &TerrainOptions) {
        log::debug!("filter {self:?} on {}×{} grid", g.xl(), g.yl());
        match self {
            Filter::Clamp => clamp(g, options),
            Filter::Edges(edge) => edges(g, options, edge),
            Filter::RadialEdges(edge) => radial_edges(g, options, edge),
            Filter::Smooth { weight } => smooth(g, *weight),
            Filter::SmoothMedian => smooth_median(g),
            Filter::SmoothConservative { multiplier } => smooth_conservative(g, *multiplier),
            Filter::Step { levels } => step(g, *levels),
            Filter::Turbulence => turbulence(g, options),
            Filter::GaussianBoxBlur { sigma, passes } => gaussian_box_blur(g, *sigma, *passes),
            Filter::ThermalErosion { iterations, talus } => ThermalErosion::new(*iterations, *talus).apply(g),
        }
    }
}

// Fold every elevation around the middle of the range: smooth noise turns
// into sharp ridges
pub fn turbulence(g: &mut HeightfieldBuffer, options: &TerrainOptions) {
    let range = options.height_range();
    let min = options.min_height;
    for v in g.as_mut_slice() {
        *v = min + ((*v - min) * 2.0 - range).abs();
    }
}

#[cfg(test)]
mod tests {
    use super::turbulence;
    use crate::buffer::HeightfieldBuffer;
    use crate::options::TerrainOptions;

    #[test]
    fn turbulence_folds_around_the_midpoint() {
        let options = TerrainOptions {
            x_segments: 2,
            y_segments: 2,
            min_height: 0.0,
            max_height: 10.0,
            ..TerrainOptions::default()
        };
        assert!(options.validate().is_ok());
        let mut g = HeightfieldBuffer::from_vec(2, 2, vec![0.0, 5.0, 10.0, 2.5, 7.5, 5.0, 10.0, 0.0, 1.0]).unwrap();
        turbulence(&mut g, &options);
        assert_eq!(g.as_slice(), &[10.0, 0.0, 10.0, 5.0, 5.0, 0.0, 10.0, 10.0, 8.0]);
    }
}
