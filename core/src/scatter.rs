// Distributing decorative instances (trees, rocks) across terrain faces

use std::f64::consts::PI;

use glam::{DQuat, DVec3, EulerRot};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::TerrainError;
use crate::generators::Generator;
use crate::mesh::{TerrainMesh, Triangle};
use crate::options::TerrainOptions;
use crate::terrain::build_heightfield;

// (first vertex, face index, face normal) -> place an instance here?
pub type SpreadPredicate = fn(&Triangle, usize, DVec3) -> bool;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Spread {
    // Each face gets an independent roll; place when it falls below the value
    Probability(f64),
    // Per-face values (see `scatter_helper`); place when below `spread`
    Map { spread: f64, values: Vec<f64> },
    #[serde(skip)]
    Predicate(SpreadPredicate),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScatterOptions {
    pub spread: Spread,
    // Width of the band above the spread threshold where the chance of
    // placement fades from 1 to 0
    pub smooth_spread: f64,
    // Instances are scaled by 1 ± size_variance
    pub size_variance: f64,
    // Faces steeper than this (radians from up) get nothing
    pub max_slope: f64,
    // Largest tilt of an instance away from upright, radians
    pub max_tilt: f64,
    // Group instances into w × h cells of the grid
    pub grid: Option<(usize, usize)>,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            spread: Spread::Probability(0.025),
            smooth_spread: 0.0,
            size_variance: 0.1,
            // 36°
            max_slope: PI / 5.0,
            max_tilt: f64::INFINITY,
            grid: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    // Face centroid
    pub position: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
    // Face the instance stands on
    pub face: usize,
    // Row-major grid cell, when grouping is enabled
    pub cell: Option<usize>,
}

// Placement map for `Spread::Map`: a heightmap at double x resolution,
// stretched to [0, 1]. Every `skip`-th cell is forced to 1 (never place)
// with probability `threshold`; all other cells keep their height
pub fn scatter_helper(
    generator: Generator,
    options: &TerrainOptions,
    skip: usize,
    threshold: f64,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<f64>, TerrainError> {
    let skip = skip.max(1);
    let helper_options = TerrainOptions {
        x_segments: options.x_segments * 2,
        stretch: true,
        min_height: 0.0,
        max_height: 1.0,
        steps: 1,
        turbulent: false,
        generator,
        after: Vec::new(),
        ..options.clone()
    };
    let mut values = build_heightfield(&helper_options, rng)?.into_vec();
    for (k, v) in values.iter_mut().enumerate() {
        if k % skip == 0 && rng.gen_range(0.0..1.0) < threshold {
            *v = 1.0;
        }
    }
    Ok(values)
}

pub fn scatter_meshes(
    mesh: &TerrainMesh,
    options: &ScatterOptions,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Instance>, TerrainError> {
    let faces = mesh.to_triangles();
    if let Spread::Map { values, .. } = &options.spread {
        if values.len() < faces.len() {
            return Err(TerrainError::DimensionMismatch {
                expected: faces.len(),
                actual: values.len(),
            });
        }
    }
    if let Some((w, h)) = options.grid {
        if w == 0 || h == 0 || w > mesh.x_segments() || h > mesh.y_segments() {
            return Err(TerrainError::InvalidOptions(format!(
                "scatter grid {w}×{h} does not fit {}×{} segments",
                mesh.x_segments(),
                mesh.y_segments()
            )));
        }
    }

    let mut instances = Vec::new();
    for (f, face) in faces.iter().enumerate() {
        let normal = face.normal();
        let place = match &options.spread {
            Spread::Probability(spread) => {
                let roll = rng.gen_range(0.0..1.0);
                passes_spread(roll, *spread, options.smooth_spread, rng)
            }
            Spread::Map { spread, values } => passes_spread(values[f], *spread, options.smooth_spread, rng),
            Spread::Predicate(predicate) => predicate(face, f, normal),
        };
        if !place || normal.angle_between(DVec3::Y) > options.max_slope {
            continue;
        }

        let mut rotation = DQuat::from_rotation_arc(DVec3::Y, normal);
        if options.max_tilt.is_finite() {
            let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
            let t = options.max_tilt;
            rotation = DQuat::from_euler(EulerRot::XYZ, x.clamp(-t, t), y, z.clamp(-t, t));
        }
        // Random yaw about the instance's own up axis
        rotation = rotation * DQuat::from_rotation_y(rng.gen_range(0.0..1.0) * 2.0 * PI);

        let variance = rng.gen_range(0.0..1.0) * options.size_variance * 2.0 - options.size_variance;
        instances.push(Instance {
            position: face.centroid(),
            rotation,
            scale: DVec3::splat(1.0 + variance),
            face: f,
            cell: options.grid.map(|grid| grid_cell(mesh, f, grid)),
        });
    }
    log::debug!("scattered {} instances over {} faces", instances.len(), faces.len());
    Ok(instances)
}

// Bucket instances by grid cell; `cells` is w × h
pub fn group_by_cell(instances: &[Instance], cells: usize) -> Vec<Vec<Instance>> {
    let mut groups = vec![Vec::new(); cells];
    for instance in instances {
        if let Some(group) = instance.cell.and_then(|c| groups.get_mut(c)) {
            group.push(*instance);
        }
    }
    groups
}

// Below `spread` always place; inside the smoothing band place with a
// probability eased from 1 down to 0 across the band
fn passes_spread(value: f64, spread: f64, smooth_spread: f64, rng: &mut ChaCha8Rng) -> bool {
    if value < spread {
        return true;
    }
    if smooth_spread > 0.0 && value < spread + smooth_spread {
        let fade = Easing::EaseInOut.apply((value - spread) / smooth_spread);
        return rng.gen_range(0.0..1.0) >= fade;
    }
    false
}

// Two faces per quad, quads in row-major order
fn grid_cell(mesh: &TerrainMesh, face: usize, (w, h): (usize, usize)) -> usize {
    let quad = face / 2;
    let (qi, qj) = (quad % mesh.x_segments(), quad / mesh.x_segments());
    let cx = (qi * w / mesh.x_segments()).min(w - 1);
    let cy = (qj * h / mesh.y_segments()).min(h - 1);
    cy * w + cx
}
