//! MongoDB collection for the document task store.

use async_trait::async_trait;
use bson::Document;
use futures_util::TryStreamExt;
use mongodb::{options::ReturnDocument, Client, Collection, IndexModel};

use crate::{collection::DocumentCollection, TaskStoreResult, ORDERING_KEY};

/// Name of the collection holding task documents.
pub const COLLECTION_NAME: &str = "tasks";

fn ascending(key: &str) -> Document {
    let mut doc = Document::new();
    doc.insert(key, 1_i32);
    doc
}

/// A MongoDB collection of task documents.
#[derive(Debug, Clone)]
pub struct MongoCollection {
    collection: Collection<Document>,
}

impl MongoCollection {
    /// Connects to `url`, selects `database` and makes sure the ordering
    /// key is indexed.
    pub async fn connect(url: &str, database: &str) -> TaskStoreResult<Self> {
        let client = Client::with_uri_str(url).await?;
        let collection = client
            .database(database)
            .collection::<Document>(COLLECTION_NAME);

        let index = IndexModel::builder().keys(ascending(ORDERING_KEY)).build();
        collection.create_index(index).await?;

        tracing::info!(database, collection = COLLECTION_NAME, "Connected to MongoDB task store");
        Ok(Self { collection })
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn delete_all(&self) -> TaskStoreResult<()> {
        self.collection.delete_many(Document::new()).await?;
        Ok(())
    }

    async fn insert_many(&self, docs: Vec<Document>) -> TaskStoreResult<()> {
        self.collection.insert_many(docs).await?;
        Ok(())
    }

    async fn find_sorted_by(&self, key: &str) -> TaskStoreResult<Vec<Document>> {
        let cursor = self
            .collection
            .find(Document::new())
            .sort(ascending(key))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one_and_set(
        &self,
        key: &str,
        value: i64,
        set: Document,
    ) -> TaskStoreResult<Option<Document>> {
        let mut filter = Document::new();
        filter.insert(key, value);
        let mut update = Document::new();
        update.insert("$set", set);

        Ok(self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?)
    }
}
