// Descriptive statistics of a generated surface

use glam::DVec3;

use crate::error::TerrainError;
use crate::mesh::TerrainMesh;
use crate::options::TerrainOptions;

#[derive(Clone, Debug, PartialEq)]
pub struct DistributionStats {
    pub sample_size: usize,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub midrange: f64,
    pub mean: f64,
    pub median: f64,
    pub first_quartile: f64,
    pub third_quartile: f64,
    pub iqr: f64,
    // Population standard deviation
    pub stdev: f64,
    // Mean absolute deviation around the median
    pub mean_absolute_deviation: f64,
    // Third standardized moment
    pub pearson_skew: f64,
    // (mean - median) / mean absolute deviation
    pub groeneveld_meeden_skew: f64,
    // Fourth standardized moment, 3 for a normal distribution
    pub kurtosis: f64,
    pub excess_kurtosis: f64,
    sorted: Vec<f64>,
}

impl DistributionStats {
    // None for an empty sample
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len() as f64;

        let (min, max) = (sorted[0], sorted[sorted.len() - 1]);
        let mean = sorted.iter().sum::<f64>() / n;
        let median = percentile(&sorted, 0.5);
        let (q1, q3) = (percentile(&sorted, 0.25), percentile(&sorted, 0.75));

        let moment = |k: i32| sorted.iter().map(|v| (v - mean).powi(k)).sum::<f64>() / n;
        let variance = moment(2);
        let stdev = variance.sqrt();
        let mad = sorted.iter().map(|v| (v - median).abs()).sum::<f64>() / n;

        // Constant samples have no spread to standardize against
        let (pearson_skew, kurtosis) = if variance > 0.0 {
            (moment(3) / stdev.powi(3), moment(4) / (variance * variance))
        } else {
            (0.0, 0.0)
        };
        let groeneveld_meeden_skew = if mad > 0.0 { (mean - median) / mad } else { 0.0 };

        Some(Self {
            sample_size: sorted.len(),
            min,
            max,
            range: max - min,
            midrange: (max + min) * 0.5,
            mean,
            median,
            first_quartile: q1,
            third_quartile: q3,
            iqr: q3 - q1,
            stdev,
            mean_absolute_deviation: mad,
            pearson_skew,
            groeneveld_meeden_skew,
            kurtosis,
            excess_kurtosis: if variance > 0.0 { kurtosis - 3.0 } else { 0.0 },
            sorted,
        })
    }

    // p in [0, 1]
    pub fn percentile(&self, p: f64) -> f64 {
        percentile(&self.sorted, p)
    }
}

// Linear interpolation between the closest ranks of a sorted sample
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let (lo, hi) = (rank.floor() as usize, rank.ceil() as usize);
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Roughness {
    // Surface area over the flat area it covers, >= 1
    pub planimetric_area_ratio: f64,
    // Mean root of summed squared differences to the 8 neighbours
    pub terrain_ruggedness_index: f64,
    // Share of vertices that are strict local peaks or pits
    pub jaggedness: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FittedPlane {
    pub centroid: DVec3,
    // Unit normal, oriented upwards
    pub normal: DVec3,
    // Tilt of the plane from horizontal, degrees
    pub slope: f64,
    // Share of elevation variance the plane accounts for, in [0, 1]
    pub variation_explained: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisReport {
    pub elevation: DistributionStats,
    // Per-face angle from vertical up, degrees
    pub slope: DistributionStats,
    pub roughness: Roughness,
    pub fitted_plane: FittedPlane,
}

pub fn analyze(mesh: &TerrainMesh, options: &TerrainOptions) -> Result<AnalysisReport, TerrainError> {
    let positions = mesh.positions();
    if positions.len() < 3 {
        return Err(TerrainError::TooFewVertices(positions.len()));
    }

    let elevations: Vec<f64> = positions.iter().map(|p| p.y).collect();
    let slopes: Vec<f64> = mesh
        .faces()
        .map(|face| face.normal().angle_between(DVec3::Y).to_degrees())
        .collect();
    let (elevation, slope) = match (
        DistributionStats::from_samples(&elevations),
        DistributionStats::from_samples(&slopes),
    ) {
        (Some(e), Some(s)) => (e, s),
        _ => return Err(TerrainError::TooFewVertices(positions.len())),
    };

    let surface_area: f64 = mesh.faces().map(|face| face.area()).sum();
    let flat_area = options.x_size * options.y_size;
    let roughness = Roughness {
        planimetric_area_ratio: if flat_area > 0.0 { surface_area / flat_area } else { 1.0 },
        terrain_ruggedness_index: ruggedness(mesh),
        jaggedness: jaggedness(mesh),
    };

    let fitted_plane = fit_plane(positions)?;
    log::debug!(
        "analyzed {} vertices: mean elevation {:.2}, mean slope {:.2}°, plane slope {:.2}°",
        positions.len(),
        elevation.mean,
        slope.mean,
        fitted_plane.slope
    );

    Ok(AnalysisReport {
        elevation,
        slope,
        roughness,
        fitted_plane,
    })
}

fn grid_neighbours(mesh: &TerrainMesh, k: usize) -> impl Iterator<Item = usize> + '_ {
    let xl = mesh.x_segments() as isize + 1;
    let yl = mesh.y_segments() as isize + 1;
    let (i, j) = (k as isize % xl, k as isize / xl);
    (-1..=1isize)
        .flat_map(|n| (-1..=1isize).map(move |m| (m, n)))
        .filter(|&(m, n)| m != 0 || n != 0)
        .map(move |(m, n)| (i + m, j + n))
        .filter(move |&(x, y)| x >= 0 && y >= 0 && x < xl && y < yl)
        .map(move |(x, y)| (y * xl + x) as usize)
}

fn ruggedness(mesh: &TerrainMesh) -> f64 {
    let p = mesh.positions();
    let total: f64 = (0..p.len())
        .map(|k| {
            grid_neighbours(mesh, k)
                .map(|n| (p[n].y - p[k].y).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .sum();
    total / p.len() as f64
}

fn jaggedness(mesh: &TerrainMesh) -> f64 {
    let p = mesh.positions();
    let extrema = (0..p.len())
        .filter(|&k| {
            let v = p[k].y;
            let mut neighbours = grid_neighbours(mesh, k).map(|n| p[n].y).peekable();
            if neighbours.peek().is_none() {
                return false;
            }
            let (mut peak, mut pit) = (true, true);
            for n in neighbours {
                peak &= v > n;
                pit &= v < n;
            }
            peak || pit
        })
        .count();
    extrema as f64 / p.len() as f64
}

// Total least squares plane through the points: of the three ways to solve
// for the normal with one component fixed, take the best conditioned one
pub fn fit_plane(points: &[DVec3]) -> Result<FittedPlane, TerrainError> {
    if points.len() < 3 {
        return Err(TerrainError::TooFewVertices(points.len()));
    }
    let n = points.len() as f64;
    let centroid = points.iter().copied().sum::<DVec3>() / n;

    let (mut xx, mut xy, mut xz, mut yy, mut yz, mut zz) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for p in points {
        let r = *p - centroid;
        xx += r.x * r.x;
        xy += r.x * r.y;
        xz += r.x * r.z;
        yy += r.y * r.y;
        yz += r.y * r.z;
        zz += r.z * r.z;
    }

    let det_x = yy * zz - yz * yz;
    let det_y = xx * zz - xz * xz;
    let det_z = xx * yy - xy * xy;
    let det_max = det_x.max(det_y).max(det_z);
    if det_max.is_nan() || det_max <= 0.0 {
        return Err(TerrainError::DegeneratePlane);
    }

    let dir = if det_max == det_x {
        DVec3::new(det_x, xz * yz - xy * zz, xy * yz - xz * yy)
    } else if det_max == det_y {
        DVec3::new(xz * yz - xy * zz, det_y, xy * xz - yz * xx)
    } else {
        DVec3::new(xy * yz - xz * yy, xy * xz - yz * xx, det_z)
    };
    let mut normal = dir.normalize();
    if normal.y < 0.0 {
        normal = -normal;
    }

    let residual: f64 = points.iter().map(|p| (*p - centroid).dot(normal).powi(2)).sum();
    let variation_explained = if yy > 0.0 {
        (1.0 - residual / yy).clamp(0.0, 1.0)
    } else {
        1.0
    };

    Ok(FittedPlane {
        centroid,
        normal,
        slope: normal.angle_between(DVec3::Y).to_degrees(),
        variation_explained,
    })
}
