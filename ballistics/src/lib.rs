// ballistics: projectile flight, drag, ray-cast collisions and impact decals

pub mod collision;
pub mod decal;
pub mod drag;
pub mod error;
pub mod hittable;
pub mod projectile;
pub mod raycast;
pub mod simulator;

pub use collision::{Outcome, deflection_probability, incidence_angle};
pub use decal::{Decal, DecalBuffer, MAX_DECALS};
pub use drag::DragModel;
pub use error::BallisticsError;
pub use hittable::{HitHandler, HitInfo, HittableId, HittableSet, RayHit, quad};
pub use projectile::{Projectile, ProjectileArena, ProjectileHandle, ProjectileOptions, ProjectileState, Termination};
pub use raycast::Ray;
pub use simulator::{SimEvent, SimulationConfig, Simulator};
