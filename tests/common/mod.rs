#![allow(dead_code)]

use sqlx::SqlitePool;
use tempfile::TempDir;
use todo_engine::db::{create_pool, run_migrations};
use todo_engine::prefs::PreferencesManager;
use todo_engine::store::TaskStore;

pub struct TestContext {
    pub pool: SqlitePool,
    pub _temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("tasks.db");

        let pool = create_pool(&db_path).await.unwrap();
        run_migrations(&pool).await.unwrap();

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn store(&self) -> TaskStore {
        TaskStore::new(self.pool.clone())
    }

    pub async fn prefs(&self) -> PreferencesManager {
        PreferencesManager::open(self.pool.clone()).await
    }
}
