//! Document collection abstraction used by the document task store.

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use crate::TaskStoreResult;

/// Key of the identifier the document engine assigns to every document.
pub const ID_KEY: &str = "_id";

/// The few collection primitives the document task store needs.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Deletes every document.
    async fn delete_all(&self) -> TaskStoreResult<()>;

    /// Inserts documents in order.
    async fn insert_many(&self, docs: Vec<Document>) -> TaskStoreResult<()>;

    /// Returns every document sorted ascending by the integer field `key`.
    async fn find_sorted_by(&self, key: &str) -> TaskStoreResult<Vec<Document>>;

    /// Atomically applies `$set: set` to the first document whose `key`
    /// equals `value` and returns the document after the update.
    async fn find_one_and_set(
        &self,
        key: &str,
        value: i64,
        set: Document,
    ) -> TaskStoreResult<Option<Document>>;
}

/// Reads an integer field regardless of its stored width.
pub(crate) fn integer_field(doc: &Document, key: &str) -> Option<i64> {
    match doc.get(key)? {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) if v.fract() == 0.0 => Some(*v as i64),
        _ => None,
    }
}

/// In-process collection for testing purposes.
///
/// Mirrors the engine behaviour the task store relies on: `_id` assignment
/// on insert and field-wise `$set` on update.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    docs: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the raw documents in insertion order.
    pub async fn raw_documents(&self) -> Vec<Document> {
        self.docs.read().await.clone()
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn delete_all(&self) -> TaskStoreResult<()> {
        self.docs.write().await.clear();
        Ok(())
    }

    async fn insert_many(&self, docs: Vec<Document>) -> TaskStoreResult<()> {
        let mut stored = self.docs.write().await;
        for mut doc in docs {
            if !doc.contains_key(ID_KEY) {
                doc.insert(ID_KEY, ObjectId::new());
            }
            stored.push(doc);
        }
        Ok(())
    }

    async fn find_sorted_by(&self, key: &str) -> TaskStoreResult<Vec<Document>> {
        let mut docs = self.docs.read().await.clone();
        docs.sort_by_key(|doc| integer_field(doc, key));
        Ok(docs)
    }

    async fn find_one_and_set(
        &self,
        key: &str,
        value: i64,
        set: Document,
    ) -> TaskStoreResult<Option<Document>> {
        let mut docs = self.docs.write().await;
        let Some(doc) = docs
            .iter_mut()
            .find(|doc| integer_field(doc, key) == Some(value))
        else {
            return Ok(None);
        };

        for (field, v) in set {
            doc.insert(field, v);
        }
        Ok(Some(doc.clone()))
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let collection = MemoryCollection::new();
        collection
            .insert_many(vec![doc! { "idx": 0_i64 }, doc! { "idx": 1_i64 }])
            .await
            .unwrap();

        let docs = collection.raw_documents().await;
        assert!(docs.iter().all(|d| d.get_object_id(ID_KEY).is_ok()));
        assert_ne!(
            docs[0].get_object_id(ID_KEY).unwrap(),
            docs[1].get_object_id(ID_KEY).unwrap()
        );
    }

    #[tokio::test]
    async fn test_find_sorted_ignores_insertion_order() {
        let collection = MemoryCollection::new();
        collection
            .insert_many(vec![
                doc! { "idx": 2_i64, "topic": "c" },
                doc! { "idx": 0_i32, "topic": "a" },
                doc! { "idx": 1_i64, "topic": "b" },
            ])
            .await
            .unwrap();

        let topics: Vec<_> = collection
            .find_sorted_by("idx")
            .await
            .unwrap()
            .iter()
            .map(|d| d.get_str("topic").unwrap().to_string())
            .collect();
        assert_eq!(topics, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_find_one_and_set_miss() {
        let collection = MemoryCollection::new();
        collection
            .insert_many(vec![doc! { "idx": 0_i64, "status": "Not Started" }])
            .await
            .unwrap();

        let result = collection
            .find_one_and_set("idx", 3, doc! { "status": "Completed" })
            .await
            .unwrap();

        assert!(result.is_none());
        let docs = collection.raw_documents().await;
        assert_eq!(docs[0].get_str("status").unwrap(), "Not Started");
    }
}
