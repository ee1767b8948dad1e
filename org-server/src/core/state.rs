use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::directory::{DirectoryStore, SqliteStore};
use crate::import::CsvReconciler;

/// Handles shared by every request
///
/// Cheap to clone: the pool and the store are reference counted.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | Immutable settings |
/// | pool | SQLite pool, for department/location repositories |
/// | store | Employee persistence seen by the directory core |
/// | importer | CSV reconciler over the same store |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub store: Arc<dyn DirectoryStore>,
    pub importer: CsvReconciler,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let store: Arc<dyn DirectoryStore> = Arc::new(SqliteStore::new(pool.clone()));
        Self {
            config,
            importer: CsvReconciler::new(store.clone()),
            pool,
            store,
        }
    }

    /// Create the work directory, open the database and run migrations
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|source| ServerError::WorkDir {
            path: config.work_dir.clone(),
            source,
        })?;
        if let Some(parent) = std::path::Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| ServerError::WorkDir {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let db = DbService::new(&config.database_path).await?;
        tracing::info!(
            work_dir = %config.work_dir,
            database = %config.database_path,
            environment = %config.environment,
            "Server state initialized"
        );
        Ok(Self::new(config.clone(), db.pool))
    }

    /// State over a private in-memory database
    pub async fn in_memory(config: Config) -> Result<Self> {
        let db = DbService::in_memory().await?;
        Ok(Self::new(config, db.pool))
    }

    pub fn store(&self) -> &dyn DirectoryStore {
        self.store.as_ref()
    }
}
