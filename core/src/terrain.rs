// Terrain build entry point: options + seed in, heightfield + mesh out

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::buffer::HeightfieldBuffer;
use crate::error::TerrainError;
use crate::filters::{clamp, smooth, step, turbulence};
use crate::mesh::TerrainMesh;
use crate::options::TerrainOptions;

#[derive(Clone, Debug)]
pub struct Terrain {
    options: TerrainOptions,
    seed: u64,
    heights: HeightfieldBuffer,
    mesh: TerrainMesh,
}

impl Terrain {
    // Run the full pipeline with a fresh generator seeded from `seed`.
    // The same options and seed always rebuild the same terrain
    pub fn generate(options: &TerrainOptions, seed: u64) -> Result<Self, TerrainError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let heights = build_heightfield(options, &mut rng)?;
        let mesh = TerrainMesh::from_heightfield(&heights, options);
        let (lo, hi) = heights.min_max();
        log::info!(
            "built {} terrain {}×{} (seed {seed}), heights [{lo:.2}, {hi:.2}]",
            options.generator.name(),
            heights.xl(),
            heights.yl()
        );
        Ok(Self {
            options: options.clone(),
            seed,
            heights,
            mesh,
        })
    }

    // Wrap elevations that were produced elsewhere (a heightmap image, storage)
    pub fn from_heightfield(options: &TerrainOptions, seed: u64, heights: HeightfieldBuffer) -> Result<Self, TerrainError> {
        options.validate()?;
        if heights.x_segments() != options.x_segments || heights.y_segments() != options.y_segments {
            return Err(TerrainError::DimensionMismatch {
                expected: options.xl() * options.yl(),
                actual: heights.len(),
            });
        }
        let mesh = TerrainMesh::from_heightfield(&heights, options);
        Ok(Self {
            options: options.clone(),
            seed,
            heights,
            mesh,
        })
    }

    pub fn options(&self) -> &TerrainOptions {
        &self.options
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn heights(&self) -> &HeightfieldBuffer {
        &self.heights
    }

    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    pub fn into_heights(self) -> HeightfieldBuffer {
        self.heights
    }
}

// generator → turbulence → step + smooth → clamp → `after` filters
pub fn build_heightfield(options: &TerrainOptions, rng: &mut ChaCha8Rng) -> Result<HeightfieldBuffer, TerrainError> {
    options.validate()?;
    let mut g = HeightfieldBuffer::for_options(options);

    options.generator.apply(&mut g, options, rng);
    if options.turbulent {
        turbulence(&mut g, options);
    }
    if options.steps > 1 {
        step(&mut g, options.steps);
        smooth(&mut g, 0.0);
    }
    // Turbulence folds the range, so the result always gets stretched back
    clamp(
        &mut g,
        &TerrainOptions {
            stretch: options.stretch || options.turbulent,
            ..options.clone()
        },
    );
    for filter in &options.after {
        filter.apply(&mut g, options);
    }

    g.assert_finite();
    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::Terrain;
    use crate::buffer::HeightfieldBuffer;
    use crate::filters::{EdgeOptions, Filter};
    use crate::generators::Generator;
    use crate::options::TerrainOptions;

    fn options(generator: Generator) -> TerrainOptions {
        TerrainOptions {
            x_segments: 32,
            y_segments: 24,
            x_size: 320.0,
            y_size: 240.0,
            generator,
            ..TerrainOptions::default()
        }
    }

    #[test]
    fn stretched_terrain_spans_the_bounds() {
        let options = options(Generator::Perlin);
        let terrain = Terrain::generate(&options, 11).unwrap();
        let (lo, hi) = terrain.heights().min_max();
        assert!((lo - options.min_height).abs() < 1e-9);
        assert!((hi - options.max_height).abs() < 1e-9);
        assert_eq!(terrain.mesh().positions().len(), 33 * 25);
    }

    #[test]
    fn same_seed_same_terrain() {
        let options = options(Generator::DiamondSquare);
        let a = Terrain::generate(&options, 5).unwrap();
        let b = Terrain::generate(&options, 5).unwrap();
        let c = Terrain::generate(&options, 6).unwrap();
        assert_eq!(a.heights(), b.heights());
        assert_ne!(a.heights(), c.heights());
    }

    #[test]
    fn steps_and_after_filters_run() {
        let options = TerrainOptions {
            steps: 4,
            after: vec![Filter::Edges(EdgeOptions::default())],
            ..options(Generator::Simplex)
        };
        let terrain = Terrain::generate(&options, 3).unwrap();
        // Edges sink the border onto min_height
        assert!((terrain.heights().get(0, 12) - options.min_height).abs() < 1e-9);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = TerrainOptions {
            x_segments: 0,
            ..TerrainOptions::default()
        };
        assert!(Terrain::generate(&options, 1).is_err());

        let options = TerrainOptions::default();
        let wrong = HeightfieldBuffer::new(3, 3);
        assert!(Terrain::from_heightfield(&options, 0, wrong).is_err());
    }
}
