use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::TerrainError;
use crate::filters::Filter;
use crate::generators::Generator;

// Configuration consumed by every generator and filter pass
// Immutable during a pass; MultiPass clones it with overridden heights/frequency
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerrainOptions {
    // Grid resolution: the buffer holds (x_segments + 1) × (y_segments + 1) vertices
    pub x_segments: usize,
    pub y_segments: usize,
    // World-space extents of the grid
    pub x_size: f64,
    pub y_size: f64,
    pub min_height: f64,
    pub max_height: f64,
    // Higher frequency = smaller features
    pub frequency: f64,
    // Stretch the generated range onto [min_height, max_height] when clamping
    pub stretch: bool,
    // Fold elevations into ridges after generation
    pub turbulent: bool,
    // Number of terraces; 1 disables stepping
    pub steps: usize,
    pub easing: Easing,
    pub generator: Generator,
    // Extra filters run after the clamp
    #[serde(default)]
    pub after: Vec<Filter>,
}

impl Default for TerrainOptions {
    fn default() -> Self {
        Self {
            x_segments: 63,
            y_segments: 63,
            x_size: 1024.0,
            y_size: 1024.0,
            min_height: -100.0,
            max_height: 100.0,
            frequency: 2.5,
            stretch: true,
            turbulent: false,
            steps: 1,
            easing: Easing::Linear,
            generator: Generator::DiamondSquare,
            after: Vec::new(),
        }
    }
}

impl TerrainOptions {
    #[inline]
    pub fn height_range(&self) -> f64 {
        self.max_height - self.min_height
    }

    // Vertices per row
    #[inline]
    pub fn xl(&self) -> usize {
        self.x_segments + 1
    }

    #[inline]
    pub fn yl(&self) -> usize {
        self.y_segments + 1
    }

    // World-space width of one grid cell along x and y
    #[inline]
    pub fn segment_size(&self) -> (f64, f64) {
        (
            self.x_size / self.x_segments as f64,
            self.y_size / self.y_segments as f64,
        )
    }

    pub fn with_heights(&self, min_height: f64, max_height: f64) -> Self {
        Self {
            min_height,
            max_height,
            ..self.clone()
        }
    }

    pub fn with_frequency(&self, frequency: f64) -> Self {
        Self {
            frequency,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.x_segments == 0 || self.y_segments == 0 {
            return Err(TerrainError::InvalidOptions(format!(
                "grid needs at least one segment per axis, got {}×{}",
                self.x_segments, self.y_segments
            )));
        }
        if !(self.x_size > 0.0 && self.y_size > 0.0 && self.x_size.is_finite() && self.y_size.is_finite()) {
            return Err(TerrainError::InvalidOptions(format!(
                "extents must be positive, got {}×{}",
                self.x_size, self.y_size
            )));
        }
        if !(self.min_height.is_finite() && self.max_height.is_finite()) || self.max_height < self.min_height {
            return Err(TerrainError::InvalidOptions(format!(
                "height bounds [{}, {}] are not an interval",
                self.min_height, self.max_height
            )));
        }
        if !(self.frequency > 0.0 && self.frequency.is_finite()) {
            return Err(TerrainError::InvalidOptions(format!(
                "frequency must be positive, got {}",
                self.frequency
            )));
        }
        if self.steps == 0 {
            return Err(TerrainError::InvalidOptions("steps must be at least 1".into()));
        }
        Ok(())
    }
}
