use storage::TerrainStore;
use storage::models::TerrainDocument;
use terrain_core::{Filter, Generator, Terrain, TerrainOptions};

#[tokio::main]
async fn main() -> mongodb::error::Result<()> {
    env_logger::init();

    // 257×257 Diamond-Square with a little weathering
    let options = TerrainOptions {
        x_segments: 256,
        y_segments: 256,
        generator: Generator::DiamondSquare,
        after: vec![Filter::ThermalErosion {
            iterations: 10,
            talus: 1.0,
        }],
        ..TerrainOptions::default()
    };
    let terrain = Terrain::generate(&options, 2025).expect("options are valid");
    let doc = TerrainDocument::from_terrain("eroded-ds", &terrain);

    let storage = TerrainStore::init("mongodb://localhost:27017", "terrain_db", "terrains").await?;

    storage.create(doc).await?;
    if let Some(found) = storage.read_by_seed(2025).await? {
        let rebuilt = found.to_terrain().expect("stored heights match the options");
        println!(
            "Round-trip success: '{}' sample [128,128] = {}",
            found.name,
            rebuilt.heights().get(128, 128)
        );
    } else {
        println!("Document not found!");
    }

    storage.delete_by_seed(2025).await?;

    Ok(())
}
