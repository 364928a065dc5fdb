use terrain_core::{Generator, Terrain, TerrainOptions, analyze};

fn main() {
    env_logger::init();

    let options = TerrainOptions {
        x_segments: 128,
        y_segments: 128,
        generator: Generator::PerlinDiamond,
        steps: 6,
        ..TerrainOptions::default()
    };
    let terrain = Terrain::generate(&options, 7).unwrap();
    let report = analyze(terrain.mesh(), &options).unwrap();

    let e = &report.elevation;
    println!(
        "elevation: mean {:.2}, median {:.2}, IQR {:.2}, stdev {:.2}",
        e.mean, e.median, e.iqr, e.stdev
    );
    println!(
        "  skew {:.3} (Pearson) / {:.3} (Groeneveld-Meeden), excess kurtosis {:.3}",
        e.pearson_skew, e.groeneveld_meeden_skew, e.excess_kurtosis
    );
    println!("  10th / 90th percentile {:.2} / {:.2}", e.percentile(0.1), e.percentile(0.9));
    let s = &report.slope;
    println!("slope: mean {:.2}°, max {:.2}°", s.mean, s.max);
    let r = &report.roughness;
    println!(
        "roughness: area ratio {:.4}, TRI {:.3}, jaggedness {:.4}",
        r.planimetric_area_ratio, r.terrain_ruggedness_index, r.jaggedness
    );
    let p = &report.fitted_plane;
    println!(
        "fitted plane: slope {:.3}°, explains {:.1}% of the variation",
        p.slope,
        p.variation_explained * 100.0
    );
}
