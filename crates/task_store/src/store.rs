//! Backend selection and the task tracker facade

use std::sync::Arc;

use async_trait::async_trait;
use entities::{TaskPatch, TaskRecord, TaskStatus};

use crate::{
    BackendKind, FileTaskStore, SqliteTaskStore, StoreConfig, TaskStore, TaskStoreError,
    TaskStoreResult,
};

/// Opens the backend named by `config`.
///
/// Exactly one backend is opened; the choice cannot change afterwards.
pub async fn open_store(config: &StoreConfig) -> TaskStoreResult<Arc<dyn TaskStore>> {
    let store: Arc<dyn TaskStore> = match config.backend {
        BackendKind::File => Arc::new(FileTaskStore::new(config.file_path())),
        BackendKind::Sqlite => Arc::new(SqliteTaskStore::connect(&config.sqlite_path()).await?),
        #[cfg(feature = "mongodb")]
        BackendKind::MongoDb => {
            let collection =
                crate::MongoCollection::connect(&config.mongo_url, &config.mongo_db).await?;
            Arc::new(crate::DocumentTaskStore::new(collection))
        }
        #[cfg(not(feature = "mongodb"))]
        BackendKind::MongoDb => {
            return Err(TaskStoreError::Config(
                "this build does not include the mongodb backend".to_string(),
            ))
        }
    };
    Ok(store)
}

/// Forwards the task store operations to the one backend chosen at start.
#[derive(Clone)]
pub struct TaskTracker {
    kind: BackendKind,
    store: Arc<dyn TaskStore>,
}

impl TaskTracker {
    /// Opens the backend named by `config`.
    pub async fn open(config: &StoreConfig) -> TaskStoreResult<Self> {
        let store = open_store(config).await?;
        tracing::info!(backend = %config.backend, "Task store ready");
        Ok(Self::new(config.backend, store))
    }

    /// Wraps an already opened backend.
    pub fn new(kind: BackendKind, store: Arc<dyn TaskStore>) -> Self {
        Self { kind, store }
    }

    /// Which backend is active.
    pub fn backend(&self) -> BackendKind {
        self.kind
    }

    /// Lists all records, propagating a corrupt flat file as an error.
    pub async fn get_all_strict(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        self.store.get_all().await
    }

    /// Returns the stored records, or stores `template` first when the
    /// store is empty.
    pub async fn get_or_init(&self, template: &[TaskRecord]) -> TaskStoreResult<Vec<TaskRecord>> {
        let existing = self.get_all().await?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        tracing::info!(count = template.len(), "Store is empty, initializing from template");
        self.store.replace(template).await?;
        Ok(template.to_vec())
    }
}

#[async_trait]
impl TaskStore for TaskTracker {
    async fn replace(&self, tasks: &[TaskRecord]) -> TaskStoreResult<()> {
        self.store.replace(tasks).await
    }

    /// Lists all records. A corrupt flat file reads as empty and is logged
    /// instead of failing the caller; its contents are lost to readers until
    /// the next replace.
    async fn get_all(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        match self.store.get_all().await {
            Err(TaskStoreError::Corrupt { path, source }) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %source,
                    "Task file is corrupt, treating it as empty"
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Updates the status of one record. A corrupt flat file holds no
    /// records, so the update finds nothing and the file is not written.
    async fn update_status(
        &self,
        index: usize,
        status: TaskStatus,
    ) -> TaskStoreResult<Option<TaskRecord>> {
        corrupt_as_missing(index, self.store.update_status(index, status).await)
    }

    async fn update_task(
        &self,
        index: usize,
        patch: &TaskPatch,
    ) -> TaskStoreResult<Option<TaskRecord>> {
        corrupt_as_missing(index, self.store.update_task(index, patch).await)
    }
}

fn corrupt_as_missing(
    index: usize,
    result: TaskStoreResult<Option<TaskRecord>>,
) -> TaskStoreResult<Option<TaskRecord>> {
    match result {
        Err(TaskStoreError::Corrupt { path, source }) => {
            tracing::warn!(
                index,
                path = %path.display(),
                error = %source,
                "Task file is corrupt, update found no task"
            );
            Ok(None)
        }
        other => other,
    }
}
