// Saves one 257×257 grayscale heightmap per generator, plus a few filtered
// variants, to compare the algorithms side by side

use terrain_core::filters::EdgeOptions;
use terrain_core::{Filter, Generator, InfluenceShape, Terrain, TerrainOptions, save_heightmap};

fn main() {
    env_logger::init();

    let base = TerrainOptions {
        x_segments: 256,
        y_segments: 256,
        ..TerrainOptions::default()
    };
    let runs = vec![
        ("perlin", Generator::Perlin, vec![]),
        ("simplex_layers", Generator::SimplexLayers, vec![]),
        ("diamond_square", Generator::DiamondSquare, vec![]),
        (
            "diamond_square_eroded",
            Generator::DiamondSquare,
            vec![Filter::ThermalErosion {
                iterations: 10,
                talus: 1.0,
            }],
        ),
        ("fault", Generator::Fault, vec![]),
        ("hill_island", Generator::HillIsland(InfluenceShape::Volcano), vec![]),
        ("particles", Generator::Particles, vec![Filter::GaussianBoxBlur { sigma: 1.5, passes: 3 }]),
        ("brownian", Generator::Brownian, vec![Filter::SmoothMedian]),
        ("weierstrass", Generator::Weierstrass, vec![]),
        ("value", Generator::Value, vec![]),
        ("worley", Generator::Worley(Default::default()), vec![]),
        ("perlin_cliffs", Generator::Perlin, vec![Filter::Edges(EdgeOptions::default())]),
    ];

    for (name, generator, after) in runs {
        let options = TerrainOptions {
            generator,
            after,
            ..base.clone()
        };
        let terrain = Terrain::generate(&options, 42).unwrap();
        let filename = format!("terrain_{name}.png");
        save_heightmap(terrain.heights(), &options, &filename).unwrap();
        println!("Saved {}", filename);
    }
}
