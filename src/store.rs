//! The task repository.
//!
//! Owns the durable task collection and is the only writer to it. Every
//! successful mutation bumps a data-version watch channel; live queries
//! subscribe to that channel and re-evaluate on each bump, which is what
//! turns a plain SELECT into a push-based stream.

use crate::db::models::Task;
use crate::error::{Result, StoreError};
use crate::prefs::SortOrder;
use crate::sql_constants::{
    COUNT_TASKS_TOTAL, DELETE_COMPLETED, DELETE_TASK, INSERT_TASK, SELECT_PREFERENCE,
    SELECT_TASKS_BY_DATE, SELECT_TASKS_BY_NAME, SELECT_TASK_BY_ID, UPDATE_TASK, UPSERT_PREFERENCE,
    UPSERT_TASK,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::watch;

const SEEDED_KEY: &str = "seeded";

#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
    changes: Arc<watch::Sender<u64>>,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            pool,
            changes: Arc::new(changes),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Data-version feed. Receivers wake after every committed mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    fn mark_changed(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }

    /// Persist a task.
    ///
    /// `id == 0` asks the store for a fresh monotonic id. A non-zero id is
    /// kept verbatim and replaces any existing row with that id — the
    /// undo-restore path re-inserts a deleted task this way, original id and
    /// creation time intact. Returns the record as persisted.
    pub async fn insert(&self, task: &Task) -> Result<Task> {
        let persisted = if task.id == 0 {
            let result = sqlx::query(INSERT_TASK)
                .bind(&task.name)
                .bind(task.is_important)
                .bind(task.is_completed)
                .bind(task.created_at)
                .execute(&self.pool)
                .await?;
            Task {
                id: result.last_insert_rowid(),
                ..task.clone()
            }
        } else {
            sqlx::query(UPSERT_TASK)
                .bind(task.id)
                .bind(&task.name)
                .bind(task.is_important)
                .bind(task.is_completed)
                .bind(task.created_at)
                .execute(&self.pool)
                .await?;
            task.clone()
        };

        self.mark_changed();
        Ok(persisted)
    }

    /// Replace the stored row for `task.id` with this record.
    ///
    /// A missing id is `TaskNotFound` rather than a silent upsert, so a
    /// caller racing a delete finds out instead of resurrecting the row.
    pub async fn update(&self, task: &Task) -> Result<()> {
        let result = sqlx::query(UPDATE_TASK)
            .bind(&task.name)
            .bind(task.is_important)
            .bind(task.is_completed)
            .bind(task.created_at)
            .bind(task.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::TaskNotFound(task.id));
        }

        self.mark_changed();
        Ok(())
    }

    /// Remove a task. Already-absent rows are a no-op, which makes duplicate
    /// swipe gestures harmless.
    pub async fn delete(&self, task: &Task) -> Result<()> {
        self.delete_by_id(task.id).await
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<()> {
        let result = sqlx::query(DELETE_TASK)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            self.mark_changed();
        }
        Ok(())
    }

    /// Remove every completed task in one statement. SQLite executes the
    /// single DELETE atomically, so a concurrent query sees the collection
    /// before or after the sweep, never mid-removal. Returns rows removed.
    pub async fn delete_completed(&self) -> Result<u64> {
        let result = sqlx::query(DELETE_COMPLETED).execute(&self.pool).await?;

        let removed = result.rows_affected();
        if removed > 0 {
            self.mark_changed();
        }
        Ok(removed)
    }

    pub async fn get(&self, id: i64) -> Result<Task> {
        sqlx::query_as::<_, Task>(SELECT_TASK_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::TaskNotFound(id))
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar(COUNT_TASKS_TOTAL)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// One snapshot of the filtered, sorted list.
    ///
    /// The sort order picks between two fixed query shapes; see
    /// `sql_constants` for why the ORDER BY column is never spliced in at
    /// runtime.
    pub async fn tasks(
        &self,
        search: &str,
        sort_order: SortOrder,
        hide_completed: bool,
    ) -> Result<Vec<Task>> {
        let query = match sort_order {
            SortOrder::ByName => SELECT_TASKS_BY_NAME,
            SortOrder::ByDate => SELECT_TASKS_BY_DATE,
        };

        let tasks = sqlx::query_as::<_, Task>(query)
            .bind(hide_completed)
            .bind(search)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    /// Insert the starter tasks a fresh database ships with. Guarded by a
    /// marker so clearing the list later does not bring them back. Returns
    /// whether seeding ran.
    pub async fn seed_sample_tasks(&self) -> Result<bool> {
        let seeded: Option<String> = sqlx::query_scalar(SELECT_PREFERENCE)
            .bind(SEEDED_KEY)
            .fetch_optional(&self.pool)
            .await?;
        if seeded.is_some() {
            return Ok(false);
        }

        for task in sample_tasks() {
            self.insert(&task).await?;
        }

        sqlx::query(UPSERT_PREFERENCE)
            .bind(SEEDED_KEY)
            .bind("true")
            .execute(&self.pool)
            .await?;

        tracing::info!("seeded sample tasks");
        Ok(true)
    }
}

fn sample_tasks() -> Vec<Task> {
    vec![
        Task::new("Wash the dishes", false),
        Task::new("Do the laundry", false),
        Task::new("Buy groceries", false),
        Task::new("Prepare food", true),
        Task::new("Call mom", false),
        Task::new("Visit grandma", false).with_completed(true),
        Task::new("Repair the bike", false).with_completed(true),
        Task::new("Water the plants", false),
    ]
}
