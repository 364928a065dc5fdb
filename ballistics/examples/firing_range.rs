// Fires a burst across generated terrain at a target plate and reports what
// each round did. Run with RUST_LOG=debug for per-projectile logs

use std::cell::Cell;
use std::rc::Rc;

use ballistics::{HitHandler, HitInfo, HittableSet, SimEvent, SimulationConfig, Simulator, quad};
use glam::DVec3;
use terrain_core::{Generator, Terrain, TerrainOptions};

struct Plate {
    hits: Rc<Cell<usize>>,
}

impl HitHandler for Plate {
    fn on_hit(&mut self, hit: &HitInfo) {
        self.hits.set(self.hits.get() + 1);
        println!("plate hit at {:.2?} by {:?}", hit.point, hit.projectile);
    }
}

fn main() {
    env_logger::init();

    let options = TerrainOptions {
        x_segments: 64,
        y_segments: 64,
        x_size: 400.0,
        y_size: 400.0,
        min_height: 0.0,
        max_height: 20.0,
        generator: Generator::PerlinLayers,
        ..TerrainOptions::default()
    };
    let terrain = Terrain::generate(&options, 7).expect("terrain options are valid");

    let mut world = HittableSet::new();
    world.add_terrain(terrain.mesh());
    // Target stand with a plate; the stand is the hittable owner
    let stand = world.add(Vec::new(), None).expect("root node");
    world
        .add(
            quad(DVec3::new(-5.0, 20.0, 150.0), DVec3::new(10.0, 0.0, 0.0), DVec3::new(0.0, 10.0, 0.0)),
            Some(stand),
        )
        .expect("stand exists");
    let hits = Rc::new(Cell::new(0));
    world
        .set_handler(stand, Box::new(Plate { hits: hits.clone() }))
        .expect("stand exists");

    let mut sim = Simulator::new(SimulationConfig {
        seed: 42,
        ..SimulationConfig::default()
    })
    .expect("default config is valid");
    sim.fire_burst(DVec3::new(0.0, 26.0, -150.0), DVec3::new(0.0, 2.0, 800.0), 10, 0.1);

    let (mut impacts, mut deflections, mut grounded, mut lost) = (0, 0, 0, 0);
    while !sim.is_idle() {
        for event in sim.tick(1.0 / 120.0, &mut world) {
            match event {
                SimEvent::Deflected { .. } => deflections += 1,
                SimEvent::Impact { .. } => impacts += 1,
                SimEvent::Grounded { .. } => grounded += 1,
                SimEvent::LeftVolume { .. } => lost += 1,
            }
        }
    }

    println!(
        "{impacts} impacts ({} on the plate), {deflections} deflections, {grounded} grounded, {lost} left the range; {} decals after {:.2}s",
        hits.get(),
        sim.decals().len(),
        sim.time()
    );
}
