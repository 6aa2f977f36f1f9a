//! Task store trait definitions.

use async_trait::async_trait;
use entities::{TaskPatch, TaskRecord, TaskStatus};

use crate::TaskStoreResult;

/// Name of the explicit ordering key used by backends without native order.
///
/// The value is assigned by the backend during a full replace and is never
/// taken from caller input.
pub const ORDERING_KEY: &str = "idx";

/// Trait for task storage operations.
///
/// A record is addressed by its zero-based position in the sequence passed
/// to the last [`TaskStore::replace`]. Partial updates never renumber
/// records. Implementations add no locking of their own: concurrent callers
/// get whatever the medium natively guarantees.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Discards every stored record and stores `tasks`, giving index `i` to
    /// the `i`-th element.
    async fn replace(&self, tasks: &[TaskRecord]) -> TaskStoreResult<()>;

    /// Lists all records ordered by index.
    ///
    /// A backing artifact that does not exist yet is an empty collection.
    async fn get_all(&self) -> TaskStoreResult<Vec<TaskRecord>>;

    /// Sets the status of the record at `index`.
    ///
    /// Returns `None` if no record has that index.
    async fn update_status(
        &self,
        index: usize,
        status: TaskStatus,
    ) -> TaskStoreResult<Option<TaskRecord>>;

    /// Applies the present fields of `patch` to the record at `index`.
    ///
    /// Returns `None` if no record has that index or the patch is empty.
    async fn update_task(
        &self,
        index: usize,
        patch: &TaskPatch,
    ) -> TaskStoreResult<Option<TaskRecord>>;
}
