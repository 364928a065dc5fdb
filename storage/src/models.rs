use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use terrain_core::{HeightfieldBuffer, Terrain, TerrainError, TerrainOptions};

// One generated terrain: everything needed to rebuild it (options + seed) and
// the elevations themselves so it can be reloaded without regenerating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub name: String,
    // BSON has no unsigned 64-bit type; the u64 seed is stored bit for bit
    pub seed: i64,
    pub options: TerrainOptions,
    pub x_segments: u32,
    pub y_segments: u32,
    // Row-major, (x_segments + 1) × (y_segments + 1)
    pub heights: Vec<f64>,
}

impl TerrainDocument {
    pub fn from_terrain(name: impl Into<String>, terrain: &Terrain) -> Self {
        let heights = terrain.heights();
        Self {
            id: None,
            name: name.into(),
            seed: terrain.seed() as i64,
            options: terrain.options().clone(),
            x_segments: heights.x_segments() as u32,
            y_segments: heights.y_segments() as u32,
            heights: heights.as_slice().to_vec(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed as u64
    }

    pub fn to_heightfield(&self) -> Result<HeightfieldBuffer, TerrainError> {
        HeightfieldBuffer::from_vec(self.x_segments as usize, self.y_segments as usize, self.heights.clone())
    }

    // Rebuild the terrain from the stored elevations (no regeneration)
    pub fn to_terrain(&self) -> Result<Terrain, TerrainError> {
        Terrain::from_heightfield(&self.options, self.seed(), self.to_heightfield()?)
    }
}
