//! Behaviour every backend must share.

use std::sync::Arc;

use entities::{TaskPatch, TaskRecord, TaskStatus};
use task_store::{
    BackendKind, DocumentTaskStore, FileTaskStore, MemoryCollection, SqliteTaskStore, TaskStore,
    TaskTracker,
};
use tempfile::TempDir;

fn plan() -> Vec<TaskRecord> {
    vec![
        TaskRecord::new(1, 1, "Arrays & Strings Basics", "Theory + 3 LeetCode Easy", 3)
            .with_date("2025-11-17"),
        TaskRecord::new(1, 2, "Hash Tables", "Theory + 3 LeetCode Easy-Medium", 3)
            .with_date("2025-11-18")
            .with_status(TaskStatus::InProgress),
        TaskRecord::new(1, 3, "Linked Lists Part 1", "Theory + 3 LeetCode Easy-Medium", 3)
            .with_date("2025-11-19")
            .with_remarks("skip the cheat sheet"),
        TaskRecord::new(2, 14, "Mock Interview #1 (Weekend)", "45-min mock", 0)
            .with_date("2025-11-30"),
    ]
}

async fn replace_then_read_back(store: &dyn TaskStore) {
    let tasks = plan();
    store.replace(&tasks).await.unwrap();
    assert_eq!(store.get_all().await.unwrap(), tasks);
}

async fn empty_replace(store: &dyn TaskStore) {
    store.replace(&plan()).await.unwrap();
    store.replace(&[]).await.unwrap();
    assert!(store.get_all().await.unwrap().is_empty());
}

async fn shorter_replace_leaves_no_stale_records(store: &dyn TaskStore) {
    store.replace(&plan()).await.unwrap();
    let shorter = vec![TaskRecord::new(3, 15, "Binary Search", "Theory", 3)];

    store.replace(&shorter).await.unwrap();

    assert_eq!(store.get_all().await.unwrap(), shorter);
    assert!(store
        .update_status(1, TaskStatus::Completed)
        .await
        .unwrap()
        .is_none());
}

async fn update_status_touches_one_record(store: &dyn TaskStore) {
    let tasks = plan();
    store.replace(&tasks).await.unwrap();

    let updated = store
        .update_status(2, TaskStatus::Completed)
        .await
        .unwrap()
        .unwrap();

    let mut expected = tasks.clone();
    expected[2].status = TaskStatus::Completed;
    assert_eq!(updated, expected[2]);
    assert_eq!(store.get_all().await.unwrap(), expected);
}

async fn out_of_range_is_not_found(store: &dyn TaskStore) {
    let tasks = plan();
    store.replace(&tasks).await.unwrap();

    let status = store.update_status(tasks.len(), TaskStatus::Completed).await;
    assert!(status.unwrap().is_none());
    let patch = TaskPatch {
        topic: Some("Tries".to_string()),
        ..TaskPatch::default()
    };
    assert!(store.update_task(99, &patch).await.unwrap().is_none());

    assert_eq!(store.get_all().await.unwrap(), tasks);
}

async fn update_task_applies_present_fields_only(store: &dyn TaskStore) {
    let tasks = plan();
    store.replace(&tasks).await.unwrap();

    let updated = store
        .update_task(1, &TaskPatch::status(TaskStatus::Completed))
        .await
        .unwrap()
        .unwrap();
    let mut expected = tasks[1].clone();
    expected.status = TaskStatus::Completed;
    assert_eq!(updated, expected);

    let patch = TaskPatch {
        activities: Some(String::new()),
        problems: Some(5),
        remarks: Some("harder than expected".to_string()),
        ..TaskPatch::default()
    };
    let updated = store.update_task(1, &patch).await.unwrap().unwrap();
    expected.activities = String::new();
    expected.problems = 5;
    expected.remarks = "harder than expected".to_string();
    assert_eq!(updated, expected);

    let mut all = tasks.clone();
    all[1] = expected;
    assert_eq!(store.get_all().await.unwrap(), all);
}

async fn empty_patch_is_a_no_op(store: &dyn TaskStore) {
    let tasks = plan();
    store.replace(&tasks).await.unwrap();

    assert!(store
        .update_task(0, &TaskPatch::default())
        .await
        .unwrap()
        .is_none());
    assert_eq!(store.get_all().await.unwrap(), tasks);
}

async fn single_record_scenario(store: &dyn TaskStore) {
    let task = TaskRecord::new(1, 1, "A", "x", 3).with_date("2025-01-01");
    store.replace(std::slice::from_ref(&task)).await.unwrap();
    assert_eq!(store.get_all().await.unwrap(), vec![task.clone()]);

    let updated = store
        .update_status(0, TaskStatus::Completed)
        .await
        .unwrap()
        .unwrap();
    let completed = task.with_status(TaskStatus::Completed);
    assert_eq!(updated, completed);

    assert!(store
        .update_status(5, TaskStatus::Completed)
        .await
        .unwrap()
        .is_none());
    assert_eq!(store.get_all().await.unwrap(), vec![completed]);
}

async fn run_contract<S, F, Fut>(open: F)
where
    S: TaskStore,
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = S>,
{
    replace_then_read_back(&open().await).await;
    empty_replace(&open().await).await;
    shorter_replace_leaves_no_stale_records(&open().await).await;
    update_status_touches_one_record(&open().await).await;
    out_of_range_is_not_found(&open().await).await;
    update_task_applies_present_fields_only(&open().await).await;
    empty_patch_is_a_no_op(&open().await).await;
    single_record_scenario(&open().await).await;
}

#[tokio::test]
async fn test_file_backend_contract() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.json");
    run_contract(|| {
        let path = path.clone();
        async move { FileTaskStore::new(path) }
    })
    .await;
}

#[tokio::test]
async fn test_sqlite_memory_backend_contract() {
    run_contract(|| async { SqliteTaskStore::in_memory().await.unwrap() }).await;
}

#[tokio::test]
async fn test_sqlite_file_backend_contract() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.sqlite3");
    let store = SqliteTaskStore::connect(&path).await.unwrap();
    run_contract(|| {
        let store = store.clone();
        async move { store }
    })
    .await;
}

#[tokio::test]
async fn test_document_backend_contract() {
    run_contract(|| async { DocumentTaskStore::new(MemoryCollection::new()) }).await;
}

#[tokio::test]
async fn test_tracker_facade_contract() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.json");
    run_contract(|| {
        let path = path.clone();
        async move { TaskTracker::new(BackendKind::File, Arc::new(FileTaskStore::new(path))) }
    })
    .await;
}

#[tokio::test]
async fn test_file_backend_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.json");
    FileTaskStore::new(&path).replace(&plan()).await.unwrap();

    let reopened = FileTaskStore::new(&path);

    assert_eq!(reopened.get_all().await.unwrap(), plan());
}

/// Runs against a live server only when `TRACKER_TEST_MONGO_URL` is set.
#[cfg(feature = "mongodb")]
#[tokio::test]
async fn test_mongodb_backend_contract() {
    let Ok(url) = std::env::var("TRACKER_TEST_MONGO_URL") else {
        return;
    };
    let collection = task_store::MongoCollection::connect(&url, "learning_tracker_test")
        .await
        .unwrap();
    let store = DocumentTaskStore::new(collection);
    run_contract(|| {
        let store = store.clone();
        async move { store }
    })
    .await;
}
