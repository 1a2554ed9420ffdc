use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::collections::BTreeMap;

use crate::dbs::mongo::models::{ModelCount, MongoVote};
use crate::error::{PersistError, Result};

const ITEM_INDEX: &str = "thread_id_post_id";

#[derive(Clone)]
pub struct MongoVoteRepository {
    database: Database,
    collection: Collection<MongoVote>,
}

impl MongoVoteRepository {
    pub fn new(client: &Client, db_name: &str, collection: &str) -> Self {
        let database = client.database(db_name);
        let collection = database.collection(collection);
        Self { database, collection }
    }

    /// Create the `(thread_id, post_id)` index the per-item aggregation relies on.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "thread_id": 1, "post_id": 1 })
            .options(IndexOptions::builder().name(ITEM_INDEX.to_string()).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    /// Insert a vote
    pub async fn insert(&self, vote: &MongoVote) -> Result<ObjectId> {
        let result = self.collection.insert_one(vote).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| PersistError::Internal("insert did not return an ObjectId".to_string()))
    }

    /// Delete every vote matching the filter
    pub async fn delete_matching(&self, filter: Document) -> Result<u64> {
        let result = self.collection.delete_many(filter).await?;
        Ok(result.deleted_count)
    }

    /// Count votes per model, optionally restricted by a `$match` filter
    pub async fn count_by_model(&self, filter: Option<Document>) -> Result<BTreeMap<String, u64>> {
        let mut pipeline = Vec::with_capacity(2);
        if let Some(filter) = filter {
            pipeline.push(doc! { "$match": filter });
        }
        pipeline.push(doc! { "$group": { "_id": "$model", "count": { "$sum": 1 } } });

        let mut cursor = self.collection.aggregate(pipeline).await?;
        let mut counts = BTreeMap::new();
        while let Some(row) = cursor.try_next().await? {
            let row: ModelCount = bson::from_document(row)?;
            counts.insert(row.model, row.count.max(0) as u64);
        }
        Ok(counts)
    }

    /// Round-trip a `ping` command to the server
    pub async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn item_filter(thread_id: &str, post_id: &str) -> Document {
        doc! { "thread_id": thread_id, "post_id": post_id }
    }
}
