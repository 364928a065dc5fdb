// storage holds the MongoDB schema & async CRUD for generated terrains

pub mod models;

use bson::doc;
use futures_util::stream::TryStreamExt;
use mongodb::{Client, Collection, IndexModel, options::ClientOptions};

use crate::models::TerrainDocument;

pub struct TerrainStore {
    col: Collection<TerrainDocument>,
}

impl TerrainStore {
    // Connect and make sure the (name, seed) index exists
    pub async fn init(uri: &str, db_name: &str, col_name: &str) -> mongodb::error::Result<Self> {
        let mut opts = ClientOptions::parse(uri).await?;
        opts.app_name = Some("TerrainStore".to_string());
        let client = Client::with_options(opts)?;
        let col = client.database(db_name).collection(col_name);

        let index_model = IndexModel::builder()
            .keys(doc! { "name": 1, "seed": 1 })
            .build();
        col.create_index(index_model).await?;
        log::info!("terrain store ready: {db_name}.{col_name}");

        Ok(Self { col })
    }

    pub async fn list_names(&self) -> mongodb::error::Result<Vec<String>> {
        let mut cursor = self.col.find(doc! {}).await?;
        let mut names = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            names.push(doc.name);
        }
        Ok(names)
    }

    pub async fn read_by_name(&self, name: &str) -> mongodb::error::Result<Option<TerrainDocument>> {
        self.col.find_one(doc! { "name": name }).await
    }

    // Insert a terrain, replacing any stored one with the same name and seed
    pub async fn create(&self, document: TerrainDocument) -> mongodb::error::Result<()> {
        let filter = doc! {
            "name": &document.name,
            "seed": document.seed,
        };
        let replaced = self.col.delete_one(filter).await?;
        if replaced.deleted_count > 0 {
            log::debug!("replacing terrain {} (seed {})", document.name, document.seed());
        }

        self.col.insert_one(document).await?;
        Ok(())
    }

    pub async fn read_by_seed(&self, seed: u64) -> mongodb::error::Result<Option<TerrainDocument>> {
        self.col.find_one(doc! { "seed": seed as i64 }).await
    }

    pub async fn delete_by_seed(&self, seed: u64) -> mongodb::error::Result<()> {
        self.col.delete_one(doc! { "seed": seed as i64 }).await?;
        Ok(())
    }
}
