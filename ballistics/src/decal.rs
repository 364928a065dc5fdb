// Impact marks left on struck surfaces, kept in a bounded FIFO

use std::collections::VecDeque;

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::hittable::HittableId;

pub const MAX_DECALS: usize = 500;
// Lift off the surface so the patch does not z-fight with it
const SURFACE_OFFSET: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decal {
    pub id: u64,
    pub node: HittableId,
    pub point: DVec3,
    pub normal: DVec3,
    // Maps +z onto the normal
    pub orientation: DQuat,
    // Edge length of the square patch
    pub size: f64,
}

impl Decal {
    pub fn new(id: u64, node: HittableId, point: DVec3, normal: DVec3, size: f64) -> Self {
        let normal = normal.normalize_or_zero();
        let orientation = if normal == DVec3::ZERO {
            DQuat::IDENTITY
        } else {
            DQuat::from_rotation_arc(DVec3::Z, normal)
        };
        Self {
            id,
            node,
            point,
            normal,
            orientation,
            size,
        }
    }

    // Patch corners in counter-clockwise order seen from the normal side
    pub fn corners(&self) -> [DVec3; 4] {
        let h = self.size * 0.5;
        let center = self.point + self.normal * SURFACE_OFFSET;
        [(-h, -h), (h, -h), (h, h), (-h, h)].map(|(x, y)| center + self.orientation * DVec3::new(x, y, 0.0))
    }
}

#[derive(Clone, Debug)]
pub struct DecalBuffer {
    decals: VecDeque<Decal>,
    capacity: usize,
    next_id: u64,
}

impl Default for DecalBuffer {
    fn default() -> Self {
        Self::with_capacity(MAX_DECALS)
    }
}

impl DecalBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            decals: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            next_id: 0,
        }
    }

    // Add a decal, evicting the oldest when full; returns the new decal's id
    pub fn push(&mut self, node: HittableId, point: DVec3, normal: DVec3, size: f64) -> u64 {
        if self.decals.len() == self.capacity {
            self.decals.pop_front();
        }
        let id = self.next_id;
        self.next_id += 1;
        self.decals.push_back(Decal::new(id, node, point, normal, size));
        id
    }

    pub fn len(&self) -> usize {
        self.decals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decals.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Decal> {
        self.decals.iter()
    }

    pub fn clear(&mut self) {
        self.decals.clear();
    }
}
