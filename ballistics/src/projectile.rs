// Projectile state and the arena that owns every live projectile

use std::f64::consts::PI;

use glam::{DQuat, DVec3};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// Generational index into a ProjectileArena; stale once the projectile is removed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectileHandle {
    index: u32,
    generation: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    // Struck a hittable surface without deflecting
    Impact,
    // Dropped below the floor
    Grounded,
    LeftVolume,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    // Waiting for its slot in a burst: elapsed < 0
    Pending,
    Flying,
    Terminated(Termination),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileOptions {
    // kg
    pub mass: f64,
    // Diameter in m, sets the frontal area for drag
    pub caliber: f64,
    pub gravity: bool,
    pub drag: bool,
}

impl Default for ProjectileOptions {
    fn default() -> Self {
        // 7.62 mm rifle round
        Self {
            mass: 0.0095,
            caliber: 0.00762,
            gravity: true,
            drag: true,
        }
    }
}

impl ProjectileOptions {
    pub fn area(&self) -> f64 {
        let r = self.caliber * 0.5;
        PI * r * r
    }
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub position: DVec3,
    pub velocity: DVec3,
    // Nose along +z, turned to face the velocity
    pub orientation: DQuat,
    // Seconds since activation, negative while pending
    pub elapsed: f64,
    pub options: ProjectileOptions,
    pub state: ProjectileState,
    // Own stream for deflection rolls, so tick order between projectiles
    // never changes an outcome
    pub(crate) rng: ChaCha8Rng,
}

impl Projectile {
    pub fn new(position: DVec3, velocity: DVec3, elapsed: f64, options: ProjectileOptions, rng: ChaCha8Rng) -> Self {
        let mut p = Self {
            position,
            velocity,
            orientation: DQuat::IDENTITY,
            elapsed,
            options,
            state: if elapsed < 0.0 {
                ProjectileState::Pending
            } else {
                ProjectileState::Flying
            },
            rng,
        };
        p.face_velocity();
        p
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, ProjectileState::Terminated(_))
    }

    pub fn forward(&self) -> DVec3 {
        self.orientation * DVec3::Z
    }

    pub(crate) fn face_velocity(&mut self) {
        let dir = self.velocity.normalize_or_zero();
        if dir != DVec3::ZERO {
            self.orientation = DQuat::from_rotation_arc(DVec3::Z, dir);
        }
    }
}

struct Slot {
    generation: u32,
    projectile: Option<Projectile>,
}

// Owns all projectiles; removed slots are recycled with a bumped generation
#[derive(Default)]
pub struct ProjectileArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl ProjectileArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, projectile: Projectile) -> ProjectileHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.projectile = Some(projectile);
            return ProjectileHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            projectile: Some(projectile),
        });
        ProjectileHandle { index, generation: 0 }
    }

    pub fn get(&self, handle: ProjectileHandle) -> Option<&Projectile> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.projectile.as_ref())
    }

    pub fn get_mut(&mut self, handle: ProjectileHandle) -> Option<&mut Projectile> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.projectile.as_mut())
    }

    pub fn remove(&mut self, handle: ProjectileHandle) -> Option<Projectile> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let projectile = slot.projectile.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(projectile)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProjectileHandle, &Projectile)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.projectile.as_ref().map(|p| {
                (
                    ProjectileHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    p,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ProjectileHandle, &mut Projectile)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.projectile.as_mut().map(|p| {
                (
                    ProjectileHandle {
                        index: index as u32,
                        generation,
                    },
                    p,
                )
            })
        })
    }

    pub fn handles(&self) -> Vec<ProjectileHandle> {
        self.iter().map(|(h, _)| h).collect()
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{Projectile, ProjectileArena, ProjectileOptions, ProjectileState};

    fn projectile(elapsed: f64) -> Projectile {
        Projectile::new(
            DVec3::ZERO,
            DVec3::new(0.0, 0.0, 10.0),
            elapsed,
            ProjectileOptions::default(),
            ChaCha8Rng::seed_from_u64(0),
        )
    }

    #[test]
    fn removed_handles_go_stale() {
        let mut arena = ProjectileArena::new();
        let a = arena.insert(projectile(0.0));
        let b = arena.insert(projectile(0.0));
        assert_eq!(arena.len(), 2);
        assert!(arena.remove(a).is_some());
        assert!(arena.get(a).is_none());
        assert!(arena.remove(a).is_none());

        // The slot is reused under a new generation
        let c = arena.insert(projectile(0.0));
        assert_ne!(a, c);
        assert!(arena.get(a).is_none());
        assert!(arena.get(c).is_some());
        assert_eq!(arena.handles().len(), 2);
        assert!(arena.get(b).is_some());
    }

    #[test]
    fn negative_elapsed_starts_pending() {
        assert_eq!(projectile(-0.1).state, ProjectileState::Pending);
        let p = projectile(0.0);
        assert_eq!(p.state, ProjectileState::Flying);
        assert!((p.forward() - DVec3::Z).length() < 1e-12);
    }
}
