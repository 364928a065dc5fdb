use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use terrain_core::scatter::group_by_cell;
use terrain_core::{Generator, ScatterOptions, Spread, Terrain, TerrainOptions, scatter_helper, scatter_meshes};

fn main() {
    env_logger::init();

    let options = TerrainOptions {
        x_segments: 63,
        y_segments: 63,
        min_height: 0.0,
        max_height: 120.0,
        generator: Generator::Hill(Default::default()),
        ..TerrainOptions::default()
    };
    let terrain = Terrain::generate(&options, 11).unwrap();

    // Clustered placement: a Perlin map decides where trees may grow
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let values = scatter_helper(Generator::Perlin, &options, 2, 0.25, &mut rng).unwrap();
    let scatter = ScatterOptions {
        spread: Spread::Map { spread: 0.3, values },
        smooth_spread: 0.05,
        grid: Some((4, 4)),
        ..ScatterOptions::default()
    };
    let trees = scatter_meshes(terrain.mesh(), &scatter, &mut rng).unwrap();

    println!("placed {} trees", trees.len());
    for (cell, group) in group_by_cell(&trees, 16).iter().enumerate() {
        println!("  cell {:>2}: {:>4} trees", cell, group.len());
    }
}
