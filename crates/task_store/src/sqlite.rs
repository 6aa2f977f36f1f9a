//! SQLite task store.
//!
//! Records live in a single `tasks` table keyed by the `idx` ordering
//! column. The pool holds exactly one connection, so statements issued by
//! this process run one after another.

use std::path::Path;

use async_trait::async_trait;
use entities::{FieldValue, TaskPatch, TaskRecord, TaskStatus};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    FromRow, Pool, QueryBuilder, Sqlite,
};

use crate::{TaskStore, TaskStoreResult, ORDERING_KEY};

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS tasks (
    idx INTEGER PRIMARY KEY,
    week INTEGER,
    day INTEGER,
    topic TEXT,
    activities TEXT,
    problems INTEGER,
    status TEXT,
    date TEXT,
    remarks TEXT
)";

/// Columns introduced after the first release, with their declarations.
/// Older databases gain them on open.
const OPTIONAL_COLUMNS: &[(&str, &str)] = &[("remarks", "TEXT")];

/// Database row for a task record
#[derive(Debug, FromRow)]
struct TaskRow {
    week: Option<i64>,
    day: Option<i64>,
    topic: Option<String>,
    activities: Option<String>,
    problems: Option<i64>,
    status: Option<String>,
    date: Option<String>,
    #[sqlx(default)]
    remarks: Option<String>,
}

impl From<TaskRow> for TaskRecord {
    fn from(row: TaskRow) -> Self {
        let count = |v: Option<i64>| v.and_then(|v| u32::try_from(v).ok()).unwrap_or_default();
        TaskRecord {
            week: count(row.week),
            day: count(row.day),
            topic: row.topic.unwrap_or_default(),
            activities: row.activities.unwrap_or_default(),
            problems: count(row.problems),
            status: row
                .status
                .as_deref()
                .and_then(TaskStatus::parse)
                .unwrap_or_default(),
            date: row.date.unwrap_or_default(),
            remarks: row.remarks.unwrap_or_default(),
        }
    }
}

/// Task store backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    pool: Pool<Sqlite>,
}

impl SqliteTaskStore {
    /// Opens (creating if needed) the database at `db_path` and brings its
    /// schema up to date.
    pub async fn connect(db_path: &Path) -> TaskStoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        tracing::info!(path = %db_path.display(), "Opened SQLite task store");
        Self::with_pool(pool).await
    }

    /// Opens a private in-memory database.
    pub async fn in_memory() -> TaskStoreResult<Self> {
        // The database vanishes with its connection, so keep it forever.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    /// Wraps an existing pool, creating and migrating the table.
    pub async fn with_pool(pool: Pool<Sqlite>) -> TaskStoreResult<Self> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn run_migrations(&self) -> TaskStoreResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        self.add_missing_columns().await;
        Ok(())
    }

    /// Adds optional columns missing from tables created by older versions.
    /// Existing rows are kept; a failure is logged and skipped.
    async fn add_missing_columns(&self) {
        let existing: Vec<String> =
            match sqlx::query_scalar("SELECT name FROM pragma_table_info('tasks')")
                .fetch_all(&self.pool)
                .await
            {
                Ok(columns) => columns,
                Err(e) => {
                    tracing::warn!(error = %e, "Could not inspect tasks table columns");
                    return;
                }
            };

        for (column, declaration) in OPTIONAL_COLUMNS {
            if existing.iter().any(|c| c == column) {
                continue;
            }

            let sql = format!("ALTER TABLE tasks ADD COLUMN {column} {declaration}");
            match sqlx::query(&sql).execute(&self.pool).await {
                Ok(_) => tracing::info!(column, "Added column to tasks table"),
                Err(e) => tracing::warn!(column, error = %e, "Failed to add column to tasks table"),
            }
        }
    }

    async fn fetch_row(&self, idx: i64) -> TaskStoreResult<Option<TaskRecord>> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM tasks WHERE idx = ?")
            .bind(idx)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(TaskRecord::from))
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn replace(&self, tasks: &[TaskRecord]) -> TaskStoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tasks").execute(&mut *tx).await?;

        for (idx, task) in tasks.iter().enumerate() {
            sqlx::query(
                "INSERT INTO tasks (idx, week, day, topic, activities, problems, status, date, \
                 remarks) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(idx as i64)
            .bind(i64::from(task.week))
            .bind(i64::from(task.day))
            .bind(&task.topic)
            .bind(&task.activities)
            .bind(i64::from(task.problems))
            .bind(task.status.as_str())
            .bind(&task.date)
            .bind(&task.remarks)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(count = tasks.len(), "Replaced tasks table");
        Ok(())
    }

    async fn get_all(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        let rows: Vec<TaskRow> = sqlx::query_as("SELECT * FROM tasks ORDER BY idx ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(TaskRecord::from).collect())
    }

    async fn update_status(
        &self,
        index: usize,
        status: TaskStatus,
    ) -> TaskStoreResult<Option<TaskRecord>> {
        let Ok(idx) = i64::try_from(index) else {
            return Ok(None);
        };

        sqlx::query("UPDATE tasks SET status = ? WHERE idx = ?")
            .bind(status.as_str())
            .bind(idx)
            .execute(&self.pool)
            .await?;

        self.fetch_row(idx).await
    }

    async fn update_task(
        &self,
        index: usize,
        patch: &TaskPatch,
    ) -> TaskStoreResult<Option<TaskRecord>> {
        let values = patch.values();
        if values.is_empty() {
            return Ok(None);
        }
        let Ok(idx) = i64::try_from(index) else {
            return Ok(None);
        };

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE tasks SET ");
        let mut assignments = builder.separated(", ");
        for (field, value) in values {
            assignments.push(format!("{field} = "));
            match value {
                FieldValue::Integer(v) => assignments.push_bind_unseparated(v),
                FieldValue::Text(v) => assignments.push_bind_unseparated(v),
            };
        }
        builder.push(format!(" WHERE {ORDERING_KEY} = "));
        builder.push_bind(idx);

        let result = builder.build().execute(&self.pool).await?;
        tracing::debug!(index, rows = result.rows_affected(), "Updated task row");

        self.fetch_row(idx).await
    }
}
