// Per-tick projectile integration, collision and bookkeeping

use glam::DVec3;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use terrain_core::Aabb;

use crate::collision::{Outcome, resolve};
use crate::decal::{DecalBuffer, MAX_DECALS};
use crate::drag::DragModel;
use crate::error::BallisticsError;
use crate::hittable::{HitInfo, HittableId, HittableSet, RayHit};
use crate::projectile::{Projectile, ProjectileArena, ProjectileHandle, ProjectileOptions, ProjectileState, Termination};
use crate::raycast::{Ray, intersects_aabb};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    // m/s², pulls along -y
    pub gravity: f64,
    // Projectiles below this height are grounded
    pub floor: f64,
    // Leaving this box terminates a projectile
    pub volume: Aabb,
    pub drag: DragModel,
    // Used by `fire` and `fire_burst`
    pub projectile: ProjectileOptions,
    pub decal_size: f64,
    pub decal_capacity: usize,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            floor: 0.0,
            volume: Aabb::new(DVec3::new(-5000.0, -1000.0, -5000.0), DVec3::new(5000.0, 5000.0, 5000.0)),
            drag: DragModel::default(),
            projectile: ProjectileOptions::default(),
            decal_size: 0.1,
            decal_capacity: MAX_DECALS,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), BallisticsError> {
        if !(self.gravity.is_finite() && self.floor.is_finite()) {
            return Err(BallisticsError::InvalidConfig(format!(
                "gravity {} and floor {} must be finite",
                self.gravity, self.floor
            )));
        }
        if self.volume.is_empty() {
            return Err(BallisticsError::InvalidConfig("simulation volume is empty".into()));
        }
        if self.decal_capacity == 0 {
            return Err(BallisticsError::InvalidConfig("decal capacity must be at least 1".into()));
        }
        if self.projectile.mass <= 0.0 {
            return Err(BallisticsError::InvalidConfig(format!(
                "projectile mass must be positive, got {}",
                self.projectile.mass
            )));
        }
        Ok(())
    }
}

// What happened to a projectile during a tick; `time` is its flight time
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimEvent {
    Deflected {
        projectile: ProjectileHandle,
        node: HittableId,
        point: DVec3,
        velocity: DVec3,
        time: f64,
    },
    Impact {
        projectile: ProjectileHandle,
        node: HittableId,
        // Node whose handler ran, if any
        target: Option<HittableId>,
        point: DVec3,
        normal: DVec3,
        decal: u64,
        time: f64,
    },
    Grounded {
        projectile: ProjectileHandle,
        position: DVec3,
        time: f64,
    },
    LeftVolume {
        projectile: ProjectileHandle,
        position: DVec3,
        time: f64,
    },
}

impl SimEvent {
    pub fn projectile(&self) -> ProjectileHandle {
        match *self {
            SimEvent::Deflected { projectile, .. }
            | SimEvent::Impact { projectile, .. }
            | SimEvent::Grounded { projectile, .. }
            | SimEvent::LeftVolume { projectile, .. } => projectile,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SimEvent::Deflected { .. })
    }
}

enum Step {
    Deflected(RayHit),
    Impact(RayHit),
    Grounded,
    LeftVolume,
}

pub struct Simulator {
    config: SimulationConfig,
    projectiles: ProjectileArena,
    decals: DecalBuffer,
    // Seeds each projectile's own stream
    rng: ChaCha8Rng,
    time: f64,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Result<Self, BallisticsError> {
        config.validate()?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            decals: DecalBuffer::with_capacity(config.decal_capacity),
            projectiles: ProjectileArena::new(),
            config,
            time: 0.0,
        })
    }

    pub fn fire(&mut self, origin: DVec3, velocity: DVec3) -> ProjectileHandle {
        self.fire_with(origin, velocity, self.config.projectile)
    }

    pub fn fire_with(&mut self, origin: DVec3, velocity: DVec3, options: ProjectileOptions) -> ProjectileHandle {
        self.spawn(origin, velocity, 0.0, options)
    }

    // `count` projectiles leaving `origin` one `interval` apart; all but the
    // first start pending
    pub fn fire_burst(&mut self, origin: DVec3, velocity: DVec3, count: usize, interval: f64) -> Vec<ProjectileHandle> {
        (0..count)
            .map(|k| self.spawn(origin, velocity, -(k as f64) * interval, self.config.projectile))
            .collect()
    }

    fn spawn(&mut self, origin: DVec3, velocity: DVec3, elapsed: f64, options: ProjectileOptions) -> ProjectileHandle {
        let rng = ChaCha8Rng::seed_from_u64(self.rng.next_u64());
        self.projectiles
            .insert(Projectile::new(origin, velocity, elapsed, options, rng))
    }

    // Advance every projectile by `dt` seconds. Geometry is only read while
    // projectiles move; hit handlers run afterwards, and terminated
    // projectiles are gone from the registry when this returns
    pub fn tick(&mut self, dt: f64, hittables: &mut HittableSet) -> Vec<SimEvent> {
        self.time += dt;
        let mut events = Vec::new();
        let mut hits: Vec<(usize, HitInfo)> = Vec::new();
        let mut finished = Vec::new();

        let world: &HittableSet = hittables;
        let bounds = world.bounds();
        for (handle, p) in self.projectiles.iter_mut() {
            let Some(step) = advance(p, dt, &self.config, world, &bounds) else {
                continue;
            };
            let time = p.elapsed;
            let event = match step {
                Step::Deflected(hit) => SimEvent::Deflected {
                    projectile: handle,
                    node: hit.node,
                    point: hit.point,
                    velocity: p.velocity,
                    time,
                },
                Step::Impact(hit) => {
                    let decal = self
                        .decals
                        .push(hit.node, hit.point, hit.normal, self.config.decal_size);
                    hits.push((
                        events.len(),
                        HitInfo {
                            projectile: handle,
                            struck: hit.node,
                            point: hit.point,
                            normal: hit.normal,
                            velocity: p.velocity,
                        },
                    ));
                    SimEvent::Impact {
                        projectile: handle,
                        node: hit.node,
                        target: None,
                        point: hit.point,
                        normal: hit.normal,
                        decal,
                        time,
                    }
                }
                Step::Grounded => SimEvent::Grounded {
                    projectile: handle,
                    position: p.position,
                    time,
                },
                Step::LeftVolume => SimEvent::LeftVolume {
                    projectile: handle,
                    position: p.position,
                    time,
                },
            };
            if event.is_terminal() {
                log::debug!("projectile {handle:?} terminated: {event:?}");
                finished.push(handle);
            }
            events.push(event);
        }

        for (index, info) in hits {
            let resolved = hittables.dispatch(&info);
            if let SimEvent::Impact { target, .. } = &mut events[index] {
                *target = resolved;
            }
        }
        for handle in finished {
            self.projectiles.remove(handle);
        }
        events
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn projectiles(&self) -> &ProjectileArena {
        &self.projectiles
    }

    pub fn projectile(&self, handle: ProjectileHandle) -> Option<&Projectile> {
        self.projectiles.get(handle)
    }

    pub fn decals(&self) -> &DecalBuffer {
        &self.decals
    }

    // Total simulated seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_idle(&self) -> bool {
        self.projectiles.is_empty()
    }
}

fn advance(p: &mut Projectile, dt: f64, config: &SimulationConfig, world: &HittableSet, bounds: &Aabb) -> Option<Step> {
    let dt = match p.state {
        ProjectileState::Terminated(_) => return None,
        ProjectileState::Pending => {
            p.elapsed += dt;
            if p.elapsed < 0.0 {
                return None;
            }
            p.state = ProjectileState::Flying;
            // Only the part of the tick after activation
            p.elapsed
        }
        ProjectileState::Flying => {
            p.elapsed += dt;
            dt
        }
    };
    if dt <= 0.0 {
        return None;
    }

    // Cast whenever this tick's path touches the hittable bounds; the box may
    // have zero thickness (a single wall, level ground)
    let reach = p.speed() * dt;
    let ray = Ray::new(p.position, p.velocity).filter(|ray| reach > 0.0 && intersects_aabb(ray, bounds, reach));
    if let Some(ray) = ray {
        if let Some(hit) = world.raycast(&ray, reach) {
            let roll = p.rng.gen_range(0.0..1.0);
            return Some(match resolve(p.velocity, &hit, roll) {
                Outcome::Deflect { position, velocity } => {
                    p.position = position;
                    p.velocity = velocity;
                    p.face_velocity();
                    Step::Deflected(hit)
                }
                Outcome::Impact => {
                    p.position = hit.point;
                    p.state = ProjectileState::Terminated(Termination::Impact);
                    Step::Impact(hit)
                }
            });
        }
    }

    integrate(p, dt, config);
    if p.position.y < config.floor {
        p.state = ProjectileState::Terminated(Termination::Grounded);
        return Some(Step::Grounded);
    }
    if !config.volume.contains(p.position) {
        p.state = ProjectileState::Terminated(Termination::LeftVolume);
        return Some(Step::LeftVolume);
    }
    None
}

// Gravity impulse, then drag against the direction of travel, then move
fn integrate(p: &mut Projectile, dt: f64, config: &SimulationConfig) {
    if p.options.gravity {
        p.velocity.y -= config.gravity * dt;
    }
    if p.options.drag {
        let speed = p.speed();
        let deceleration = config.drag.deceleration(speed, p.options.area(), p.options.mass);
        // Drag can stop a projectile but never reverse it
        let dv = (deceleration * dt).min(speed);
        p.velocity -= p.velocity.normalize_or_zero() * dv;
    }
    p.position += p.velocity * dt;
    p.face_velocity();
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::{SimEvent, SimulationConfig, Simulator};
    use crate::hittable::HittableSet;
    use crate::projectile::{ProjectileOptions, ProjectileState};

    fn inert() -> ProjectileOptions {
        ProjectileOptions {
            gravity: false,
            drag: false,
            ..ProjectileOptions::default()
        }
    }

    #[test]
    fn burst_activation_integrates_only_the_remainder() {
        let config = SimulationConfig {
            projectile: inert(),
            ..SimulationConfig::default()
        };
        let mut sim = Simulator::new(config).unwrap();
        let origin = DVec3::new(0.0, 10.0, 0.0);
        let velocity = DVec3::new(0.0, 0.0, 100.0);
        let burst = sim.fire_burst(origin, velocity, 3, 0.125);
        let mut world = HittableSet::new();

        sim.tick(0.1, &mut world);
        assert_eq!(sim.projectile(burst[1]).unwrap().state, ProjectileState::Pending);
        assert_eq!(sim.projectile(burst[1]).unwrap().position, origin);

        sim.tick(0.1, &mut world);
        let second = sim.projectile(burst[1]).unwrap();
        assert_eq!(second.state, ProjectileState::Flying);
        assert!((second.position.z - 7.5).abs() < 1e-9);
        assert!((sim.projectile(burst[0]).unwrap().position.z - 20.0).abs() < 1e-9);
        assert_eq!(sim.projectile(burst[2]).unwrap().state, ProjectileState::Pending);
    }

    #[test]
    fn drag_slows_but_never_reverses() {
        let config = SimulationConfig {
            projectile: ProjectileOptions {
                gravity: false,
                ..ProjectileOptions::default()
            },
            ..SimulationConfig::default()
        };
        let mut sim = Simulator::new(config).unwrap();
        let handle = sim.fire(DVec3::new(0.0, 1.0, 0.0), DVec3::new(800.0, 0.0, 0.0));
        let mut world = HittableSet::new();
        let mut last = 800.0;
        for _ in 0..60 {
            sim.tick(1.0 / 60.0, &mut world);
            let p = sim.projectile(handle).unwrap();
            assert!(p.velocity.x > 0.0 && p.velocity.x < last);
            last = p.velocity.x;
            assert!((p.forward() - DVec3::X).length() < 1e-9);
        }
    }

    #[test]
    fn leaving_the_volume_terminates() {
        let config = SimulationConfig {
            projectile: inert(),
            ..SimulationConfig::default()
        };
        let mut sim = Simulator::new(config).unwrap();
        let handle = sim.fire(DVec3::new(4990.0, 1.0, 0.0), DVec3::new(100.0, 0.0, 0.0));
        let events = sim.tick(0.5, &mut HittableSet::new());
        assert!(matches!(events.as_slice(), [SimEvent::LeftVolume { projectile, .. }] if *projectile == handle));
        assert!(sim.projectile(handle).is_none());
        assert!(sim.is_idle());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimulationConfig {
            decal_capacity: 0,
            ..SimulationConfig::default()
        };
        assert!(Simulator::new(config).is_err());
    }
}
