// terrain_core: heightfield generation, filtering, analysis and scattering

pub mod analyze;
pub mod buffer;
pub mod compositor;
pub mod easing;
pub mod error;
pub mod filters;
pub mod generators;
pub mod heightmap;
pub mod mesh;
pub mod options;
pub mod perlin2;
pub mod render;
pub mod scatter;
pub mod simplex2;
pub mod terrain;

pub use analyze::{AnalysisReport, DistributionStats, FittedPlane, Roughness, analyze};
pub use buffer::HeightfieldBuffer;
pub use compositor::{Blend, InfluenceShape, Pass, PassMethod, influence, multi_pass};
pub use easing::Easing;
pub use error::TerrainError;
pub use filters::Filter;
pub use generators::Generator;
pub use heightmap::{from_heightmap, load_heightmap, save_heightmap, to_heightmap};
pub use mesh::{Aabb, TerrainMesh, Triangle};
pub use options::TerrainOptions;
pub use perlin2::Perlin2D;
pub use render::render_preview;
pub use scatter::{Instance, ScatterOptions, Spread, scatter_helper, scatter_meshes};
pub use simplex2::Simplex2D;
pub use terrain::{Terrain, build_heightfield};

// Coherent noise source sampled at 2D points, roughly in [-1, 1]
pub trait NoiseGenerator {
    fn get2(&self, x: f64, y: f64) -> f64;
}
