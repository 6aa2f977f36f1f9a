//! Flat-file task store.
//!
//! The whole collection lives in one JSON document, `{ "tasks": [...] }`,
//! and every mutation rewrites it. There is no locking: two writers racing
//! on the same file lose one of the updates.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use entities::{TaskPatch, TaskRecord, TaskStatus};
use serde::{Deserialize, Serialize};

use crate::{TaskStore, TaskStoreError, TaskStoreResult};

/// On-disk shape of the task file.
#[derive(Debug, Default, Deserialize)]
struct TaskFile {
    #[serde(default)]
    tasks: Vec<TaskRecord>,
}

/// Task store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileTaskStore {
    path: PathBuf,
}

impl FileTaskStore {
    /// Creates a store for the file at `path`. Nothing is touched until the
    /// first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Creating empty task file");
                self.write(&[]).await?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let file: TaskFile = serde_json::from_str(&raw)
            .map_err(|e| TaskStoreError::corrupt(&self.path, e))?;
        Ok(file.tasks)
    }

    async fn write(&self, tasks: &[TaskRecord]) -> TaskStoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        #[derive(Serialize)]
        struct TaskFileRef<'a> {
            tasks: &'a [TaskRecord],
        }

        let contents = serde_json::to_string_pretty(&TaskFileRef { tasks })?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }

    async fn modify(
        &self,
        index: usize,
        apply: impl FnOnce(&mut TaskRecord) + Send,
    ) -> TaskStoreResult<Option<TaskRecord>> {
        let mut tasks = self.read().await?;
        let Some(task) = tasks.get_mut(index) else {
            return Ok(None);
        };
        apply(task);
        let updated = task.clone();

        self.write(&tasks).await?;
        Ok(Some(updated))
    }
}

#[async_trait]
impl TaskStore for FileTaskStore {
    async fn replace(&self, tasks: &[TaskRecord]) -> TaskStoreResult<()> {
        tracing::debug!(count = tasks.len(), path = %self.path.display(), "Replacing task file");
        self.write(tasks).await
    }

    async fn get_all(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        self.read().await
    }

    async fn update_status(
        &self,
        index: usize,
        status: TaskStatus,
    ) -> TaskStoreResult<Option<TaskRecord>> {
        self.modify(index, |task| task.status = status).await
    }

    async fn update_task(
        &self,
        index: usize,
        patch: &TaskPatch,
    ) -> TaskStoreResult<Option<TaskRecord>> {
        if patch.is_empty() {
            return Ok(None);
        }
        self.modify(index, |task| patch.apply_to(task)).await
    }
}
