use storage::TerrainStore;
use storage::models::TerrainDocument;
use terrain_core::{Generator, Terrain, TerrainOptions};
use tokio::runtime::Builder;

#[test]
#[ignore = "needs a MongoDB server on localhost:27017"]
fn test_roundtrip_terrain() {
    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build Tokio runtime");

    rt.block_on(async {
        let options = TerrainOptions {
            x_segments: 64,
            y_segments: 64,
            generator: Generator::DiamondSquare,
            ..TerrainOptions::default()
        };
        let terrain = Terrain::generate(&options, 42).expect("generation failed");
        let doc = TerrainDocument::from_terrain("roundtrip", &terrain);

        let storage = TerrainStore::init("mongodb://localhost:27017", "terrain_db", "terrains")
            .await
            .expect("storage init failed");

        storage.create(doc.clone()).await.expect("create failed");
        // A second create replaces instead of duplicating
        storage.create(doc).await.expect("replace failed");
        let found = storage
            .read_by_seed(42)
            .await
            .expect("read failed")
            .expect("doc not found");

        assert_eq!(found.heights.len(), 65 * 65);
        assert_eq!(found.heights, terrain.heights().as_slice());
        let names = storage.list_names().await.expect("list failed");
        assert_eq!(names.iter().filter(|n| *n == "roundtrip").count(), 1);

        storage.delete_by_seed(42).await.expect("delete failed");
        assert!(storage.read_by_seed(42).await.expect("read failed").is_none());
    });
}
