use std::path::Path;

use terrain_core::{Filter, Generator, Terrain, TerrainOptions, render_preview};

fn main() {
    env_logger::init();

    // 513×513 Diamond-Square, weathered, islanded by the edge filter
    let options = TerrainOptions {
        x_segments: 512,
        y_segments: 512,
        x_size: 4096.0,
        y_size: 4096.0,
        min_height: 0.0,
        max_height: 300.0,
        generator: Generator::DiamondSquare,
        after: vec![
            Filter::ThermalErosion {
                iterations: 20,
                talus: 1.0,
            },
            Filter::RadialEdges(Default::default()),
        ],
        ..TerrainOptions::default()
    };
    let terrain = Terrain::generate(&options, 2025).unwrap();

    let img = render_preview(terrain.heights(), 1.0);
    let path = Path::new("terrain_final.png");
    img.save(path).unwrap();
    println!("Saved final terrain image to {:?}", path);
}
