//! Document task store.
//!
//! Documents carry no native order, so each one is tagged with the
//! [`ORDERING_KEY`] at replace time and reads sort on it. Replace is a
//! delete followed by an insert and is not atomic: a concurrent reader can
//! observe an empty or partial collection in between.

use async_trait::async_trait;
use bson::{Bson, Document};
use entities::{FieldValue, TaskPatch, TaskRecord, TaskStatus};

use crate::{
    collection::{DocumentCollection, ID_KEY},
    TaskStore, TaskStoreResult, ORDERING_KEY,
};

/// Task store over a [`DocumentCollection`].
#[derive(Debug, Clone)]
pub struct DocumentTaskStore<C> {
    collection: C,
}

impl<C: DocumentCollection> DocumentTaskStore<C> {
    /// Creates a task store over `collection`.
    pub fn new(collection: C) -> Self {
        Self { collection }
    }

    /// Returns the underlying collection.
    pub fn collection(&self) -> &C {
        &self.collection
    }

    async fn set_fields(&self, index: usize, set: Document) -> TaskStoreResult<Option<TaskRecord>> {
        let Ok(idx) = i64::try_from(index) else {
            return Ok(None);
        };

        let updated = self
            .collection
            .find_one_and_set(ORDERING_KEY, idx, strip_identity(set))
            .await?;
        tracing::debug!(index, found = updated.is_some(), "Updated task document");

        updated.map(decode).transpose()
    }
}

fn strip_identity(mut doc: Document) -> Document {
    doc.remove(ORDERING_KEY);
    doc.remove(ID_KEY);
    doc
}

fn encode(idx: usize, task: &TaskRecord) -> TaskStoreResult<Document> {
    let mut doc = bson::to_document(task)?;
    doc.insert(ORDERING_KEY, idx as i64);
    Ok(doc)
}

fn decode(doc: Document) -> TaskStoreResult<TaskRecord> {
    Ok(bson::from_document(strip_identity(doc))?)
}

fn set_document(patch: &TaskPatch) -> Document {
    patch
        .values()
        .into_iter()
        .map(|(field, value)| {
            let value = match value {
                FieldValue::Integer(v) => Bson::Int64(v),
                FieldValue::Text(v) => Bson::String(v),
            };
            (field.name().to_string(), value)
        })
        .collect()
}

#[async_trait]
impl<C: DocumentCollection> TaskStore for DocumentTaskStore<C> {
    async fn replace(&self, tasks: &[TaskRecord]) -> TaskStoreResult<()> {
        let docs = tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| encode(idx, task))
            .collect::<TaskStoreResult<Vec<_>>>()?;

        self.collection.delete_all().await?;
        if !docs.is_empty() {
            self.collection.insert_many(docs).await?;
        }

        tracing::debug!(count = tasks.len(), "Replaced task documents");
        Ok(())
    }

    async fn get_all(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        self.collection
            .find_sorted_by(ORDERING_KEY)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn update_status(
        &self,
        index: usize,
        status: TaskStatus,
    ) -> TaskStoreResult<Option<TaskRecord>> {
        self.set_fields(index, set_document(&TaskPatch::status(status)))
            .await
    }

    async fn update_task(
        &self,
        index: usize,
        patch: &TaskPatch,
    ) -> TaskStoreResult<Option<TaskRecord>> {
        let set = set_document(patch);
        if set.is_empty() {
            return Ok(None);
        }
        self.set_fields(index, set).await
    }
}
