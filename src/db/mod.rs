pub mod models;

use crate::error::Result;
use crate::sql_constants::{SELECT_PREFERENCE, UPSERT_PREFERENCE};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};

const DATA_DIR: &str = "todo-engine";
const DB_FILE: &str = "tasks.db";

/// Bumped whenever the task relation changes shape. There is no versioned
/// migration chain: an incompatible stored version drops and recreates the
/// task table.
const SCHEMA_VERSION: &str = "1";

pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await?;

    // The preferences table doubles as schema-version bookkeeping, so it is
    // created first and never dropped.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS preferences (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    let stored_version: Option<String> = sqlx::query_scalar(SELECT_PREFERENCE)
        .bind("schema_version")
        .fetch_optional(pool)
        .await?;

    if let Some(version) = stored_version {
        if version != SCHEMA_VERSION {
            tracing::warn!(
                stored = %version,
                current = SCHEMA_VERSION,
                "incompatible task schema, dropping and recreating"
            );
            sqlx::query("DROP TABLE IF EXISTS tasks").execute(pool).await?;
        }
    }

    // AUTOINCREMENT keeps ids monotonic: a deleted task's id is never handed
    // out again, which the undo-restore path relies on.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            is_important BOOLEAN NOT NULL DEFAULT 0,
            is_completed BOOLEAN NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One index per list-query shape
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_tasks_important_name
        ON tasks(is_important, name)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_tasks_important_created
        ON tasks(is_important, created_at)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(UPSERT_PREFERENCE)
        .bind("schema_version")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the parent directory if needed, connect, and migrate.
pub async fn open(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let pool = create_pool(db_path).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Default database location.
///
/// Priority: TODO_ENGINE_DATA_DIR env var, then the platform data directory,
/// then the current directory.
pub fn default_db_path() -> PathBuf {
    if let Ok(dir) = std::env::var("TODO_ENGINE_DATA_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir).join(DB_FILE);
        }
    }

    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR)
        .join(DB_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_pool_success() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let pool = create_pool(&db_path).await.unwrap();

        let result: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(result, 1);
    }

    #[tokio::test]
    async fn test_run_migrations_creates_tables() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path).await.unwrap();

        run_migrations(&pool).await.unwrap();

        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();

        assert!(tables.contains(&"tasks".to_string()));
        assert!(tables.contains(&"preferences".to_string()));
    }

    #[tokio::test]
    async fn test_run_migrations_creates_indexes() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path).await.unwrap();

        run_migrations(&pool).await.unwrap();

        let indexes: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='index'")
                .fetch_all(&pool)
                .await
                .unwrap();

        assert!(indexes.contains(&"idx_tasks_important_name".to_string()));
        assert!(indexes.contains(&"idx_tasks_important_created".to_string()));
    }

    #[tokio::test]
    async fn test_run_migrations_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path).await.unwrap();

        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table'")
                .fetch_all(&pool)
                .await
                .unwrap();

        assert!(tables.contains(&"tasks".to_string()));
    }

    #[tokio::test]
    async fn test_schema_version_tracking() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let version: String = sqlx::query_scalar(SELECT_PREFERENCE)
            .bind("schema_version")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(version, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_incompatible_schema_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path).await.unwrap();
        run_migrations(&pool).await.unwrap();

        sqlx::query("INSERT INTO tasks (name, created_at) VALUES ('stale', 0)")
            .execute(&pool)
            .await
            .unwrap();

        // Simulate a database written by an older incompatible build.
        sqlx::query(UPSERT_PREFERENCE)
            .bind("schema_version")
            .bind("0")
            .execute(&pool)
            .await
            .unwrap();

        run_migrations(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);

        let version: String = sqlx::query_scalar(SELECT_PREFERENCE)
            .bind("schema_version")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_open_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("dir").join("test.db");

        let pool = open(&db_path).await.unwrap();

        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table'")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert!(tables.contains(&"tasks".to_string()));
    }
}
