// Collidable geometry: nodes of triangles arranged in an ownership tree

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use terrain_core::{Aabb, TerrainMesh, Triangle};

use crate::error::BallisticsError;
use crate::projectile::ProjectileHandle;
use crate::raycast::{Ray, intersect_triangle, intersects_aabb};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HittableId(pub u32);

// What a handler learns about the impact that triggered it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitInfo {
    pub projectile: ProjectileHandle,
    // Node whose triangle was struck; may be a descendant of the handler's node
    pub struck: HittableId,
    pub point: DVec3,
    pub normal: DVec3,
    pub velocity: DVec3,
}

pub trait HitHandler {
    fn on_hit(&mut self, hit: &HitInfo);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub node: HittableId,
    pub point: DVec3,
    // Geometric face normal, either side
    pub normal: DVec3,
    pub distance: f64,
}

struct Node {
    triangles: Vec<Triangle>,
    bounds: Aabb,
    parent: Option<HittableId>,
    handler: Option<Box<dyn HitHandler>>,
}

pub struct HittableSet {
    nodes: Vec<Option<Node>>,
    bounds: Aabb,
}

impl Default for HittableSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HittableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HittableSet")
            .field("nodes", &self.len())
            .field("bounds", &self.bounds)
            .finish()
    }
}

impl HittableSet {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            bounds: Aabb::EMPTY,
        }
    }

    // Geometry without a handler of its own. A node without triangles is a
    // pure group, useful as a parent that owns the handler
    pub fn add(&mut self, triangles: Vec<Triangle>, parent: Option<HittableId>) -> Result<HittableId, BallisticsError> {
        if let Some(p) = parent {
            self.node(p)?;
        }
        let bounds = Aabb::from_points(triangles.iter().flat_map(|t| t.vertices()));
        self.bounds = self.bounds.union(bounds);
        let id = HittableId(self.nodes.len() as u32);
        self.nodes.push(Some(Node {
            triangles,
            bounds,
            parent,
            handler: None,
        }));
        Ok(id)
    }

    pub fn add_terrain(&mut self, mesh: &TerrainMesh) -> HittableId {
        let bounds = mesh.aabb();
        self.bounds = self.bounds.union(bounds);
        let id = HittableId(self.nodes.len() as u32);
        self.nodes.push(Some(Node {
            triangles: mesh.to_triangles(),
            bounds,
            parent: None,
            handler: None,
        }));
        id
    }

    // Makes the node hittable
    pub fn set_handler(&mut self, id: HittableId, handler: Box<dyn HitHandler>) -> Result<(), BallisticsError> {
        self.node_mut(id)?.handler = Some(handler);
        Ok(())
    }

    pub fn is_hittable(&self, id: HittableId) -> bool {
        self.node(id).map(|n| n.handler.is_some()).unwrap_or(false)
    }

    pub fn parent(&self, id: HittableId) -> Option<HittableId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    // Drops the node; children keep their geometry but lose this ancestor
    pub fn remove(&mut self, id: HittableId) -> Result<(), BallisticsError> {
        self.node(id)?;
        self.nodes[id.0 as usize] = None;
        self.bounds = self
            .nodes
            .iter()
            .flatten()
            .fold(Aabb::EMPTY, |b, n| b.union(n.bounds));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Box around every node's geometry
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    // Nearest intersection within `max_distance`
    pub fn raycast(&self, ray: &Ray, max_distance: f64) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for (k, node) in self.nodes.iter().enumerate() {
            let Some(node) = node else { continue };
            let limit = best.map_or(max_distance, |b| b.distance);
            if !intersects_aabb(ray, &node.bounds, limit) {
                continue;
            }
            for tri in &node.triangles {
                let Some(t) = intersect_triangle(ray, tri) else { continue };
                if t <= max_distance && best.is_none_or(|b| t < b.distance) {
                    best = Some(RayHit {
                        node: HittableId(k as u32),
                        point: ray.at(t),
                        normal: tri.normal(),
                        distance: t,
                    });
                }
            }
        }
        best
    }

    // Nearest node in the ancestor chain (the node itself first) with a handler
    pub fn hittable_ancestor(&self, id: HittableId) -> Option<HittableId> {
        let mut current = Some(id);
        // Parents always precede their children, so the chain is finite
        while let Some(c) = current {
            let node = self.node(c).ok()?;
            if node.handler.is_some() {
                return Some(c);
            }
            current = node.parent;
        }
        None
    }

    // Invoke the handler owning `hit.struck`; returns whose handler ran
    pub fn dispatch(&mut self, hit: &HitInfo) -> Option<HittableId> {
        let target = self.hittable_ancestor(hit.struck)?;
        if let Some(handler) = self.node_mut(target).ok()?.handler.as_mut() {
            handler.on_hit(hit);
        }
        Some(target)
    }

    fn node(&self, id: HittableId) -> Result<&Node, BallisticsError> {
        self.nodes
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(BallisticsError::UnknownHittable(id))
    }

    fn node_mut(&mut self, id: HittableId) -> Result<&mut Node, BallisticsError> {
        self.nodes
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(BallisticsError::UnknownHittable(id))
    }
}

// Two triangles spanning the rectangle corner, corner + u, corner + u + v, corner + v
pub fn quad(corner: DVec3, u: DVec3, v: DVec3) -> Vec<Triangle> {
    vec![
        Triangle::new(corner, corner + u, corner + u + v),
        Triangle::new(corner, corner + u + v, corner + v),
    ]
}
