use ballistics::{HittableSet, SimulationConfig, Simulator};
use criterion::{Criterion, criterion_group, criterion_main};
use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use terrain_core::filters::gaussian_box_blur;
use terrain_core::{
    Filter, Generator, HeightfieldBuffer, Terrain, TerrainOptions, analyze, render_preview, to_heightmap,
};

const SEGMENTS: usize = 256;
const SEED: u64 = 2025;

fn options(generator: Generator) -> TerrainOptions {
    TerrainOptions {
        x_segments: SEGMENTS,
        y_segments: SEGMENTS,
        generator,
        ..TerrainOptions::default()
    }
}

fn bench_diamond_square_pipeline(c: &mut Criterion) {
    let options = options(Generator::DiamondSquare);
    c.bench_function("DiamondSquare terrain + heightmap + preview", |b| {
        b.iter(|| {
            let terrain = Terrain::generate(&options, SEED).unwrap();
            let _gray = to_heightmap(terrain.heights(), &options);
            let _img = render_preview(terrain.heights(), 1.0);
        })
    });
}

fn bench_diamond_square_with_erosion(c: &mut Criterion) {
    let options = TerrainOptions {
        after: vec![Filter::ThermalErosion {
            iterations: 5,
            talus: 1.0,
        }],
        ..options(Generator::DiamondSquare)
    };
    c.bench_function("DiamondSquare + erosion (5 iters) terrain", |b| {
        b.iter(|| Terrain::generate(&options, SEED).unwrap())
    });
}

fn bench_noise_generators(c: &mut Criterion) {
    for generator in [Generator::Perlin, Generator::Simplex, Generator::PerlinLayers, Generator::Worley(Default::default())] {
        let options = options(generator);
        c.bench_function(&format!("{} generate", options.generator.name()), |b| {
            b.iter(|| {
                let mut g = HeightfieldBuffer::for_options(&options);
                options
                    .generator
                    .apply(&mut g, &options, &mut ChaCha8Rng::seed_from_u64(SEED));
                g
            })
        });
    }
}

fn bench_gaussian_blur(c: &mut Criterion) {
    let options = options(Generator::Simplex);
    let base = Terrain::generate(&options, SEED).unwrap().into_heights();
    c.bench_function("GaussianBoxBlur sigma 3, 3 passes", |b| {
        b.iter(|| {
            let mut g = base.clone();
            gaussian_box_blur(&mut g, 3.0, 3);
            g
        })
    });
}

fn bench_analyze(c: &mut Criterion) {
    let options = options(Generator::DiamondSquare);
    let terrain = Terrain::generate(&options, SEED).unwrap();
    c.bench_function("analyze 257×257 terrain", |b| {
        b.iter(|| analyze(terrain.mesh(), &options).unwrap())
    });
}

fn bench_projectile_ticks(c: &mut Criterion) {
    let options = TerrainOptions {
        x_segments: 64,
        y_segments: 64,
        x_size: 400.0,
        y_size: 400.0,
        min_height: 0.0,
        max_height: 20.0,
        ..options(Generator::PerlinLayers)
    };
    let terrain = Terrain::generate(&options, SEED).unwrap();
    c.bench_function("100 projectiles, 60 ticks over terrain", |b| {
        b.iter(|| {
            let mut world = HittableSet::new();
            world.add_terrain(terrain.mesh());
            let mut sim = Simulator::new(SimulationConfig::default()).unwrap();
            for k in 0..100 {
                let yaw = k as f64 * 0.01;
                sim.fire(DVec3::new(0.0, 30.0, 0.0), DVec3::new(yaw.sin() * 300.0, -5.0, yaw.cos() * 300.0));
            }
            for _ in 0..60 {
                sim.tick(1.0 / 60.0, &mut world);
            }
            sim.decals().len()
        })
    });
}

// RUST_LOG=debug prints the generator and filter passes while benchmarking
fn configured() -> Criterion {
    let _ = env_logger::try_init();
    Criterion::default()
}

criterion_group! {
    name = terrain_benchmarks;
    config = configured();
    targets = bench_diamond_square_pipeline,
        bench_diamond_square_with_erosion,
        bench_noise_generators,
        bench_gaussian_blur,
        bench_analyze,
        bench_projectile_ticks
}
criterion_main!(terrain_benchmarks);
