//! Database module for simpletodo
//!
//! Provides SurrealDB connection management with an embedded RocksDB backend,
//! schema initialization, the task and tag repositories, the transaction
//! manager that keeps both sides of an association consistent, and the
//! service layer built on top of it.

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod schema;
pub mod service;
pub mod transaction;

pub use config::{DbConfig, Tables};
pub use error::{DbError, DbResult};
pub use models::{Association, Tag, Task};
pub use repository::{TagRepository, TaskRepository};
pub use service::TodoService;
pub use transaction::{TransactionManager, TransactionScope};

use std::path::{Path, PathBuf};
use std::process::Command;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use tokio::sync::Mutex;

/// Default database path relative to project root or current working directory
pub const DEFAULT_DB_PATH: &str = ".simpletodo/data";

/// Database wrapper providing connection management for SurrealDB
pub struct Database {
    /// The underlying SurrealDB client
    client: Surreal<Db>,
    /// Path where the database is stored, `None` for in-memory databases
    path: Option<PathBuf>,
    /// Namespace, database and table names
    config: DbConfig,
    /// Serializes units of work issued through this database
    transaction_lock: Mutex<()>,
}

impl Database {
    /// Connect to a SurrealDB database at the specified path.
    ///
    /// Creates the database directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `DbError::CreateDirectory` if directory creation fails.
    /// Returns `DbError::Connection` if database connection fails.
    pub async fn connect(path: &Path, config: DbConfig) -> DbResult<Self> {
        let path = Self::prepare_path(path)?;

        let client =
            Surreal::new::<RocksDb>(path.clone())
                .await
                .map_err(|e| DbError::Connection {
                    path: path.clone(),
                    source: Box::new(e),
                })?;

        Ok(Self::from_client(client, Some(path), config))
    }

    /// Open a fresh database that lives only as long as this value.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Connection` if the engine cannot be started.
    pub async fn in_memory(config: DbConfig) -> DbResult<Self> {
        let client = Surreal::new::<Mem>(())
            .await
            .map_err(|e| DbError::Connection {
                path: PathBuf::from("memory"),
                source: Box::new(e),
            })?;

        Ok(Self::from_client(client, None, config))
    }

    fn from_client(client: Surreal<Db>, path: Option<PathBuf>, config: DbConfig) -> Self {
        Self {
            client,
            path,
            config,
            transaction_lock: Mutex::new(()),
        }
    }

    /// Initialize the database schema.
    ///
    /// Selects the configured namespace and database, then defines the task
    /// and tag tables.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Schema` if schema initialization fails.
    pub async fn init(&self) -> DbResult<()> {
        self.client
            .use_ns(self.config.namespace.as_str())
            .use_db(self.config.database.as_str())
            .await
            .map_err(|e| DbError::Schema(Box::new(e)))?;

        schema::init_schema(&self.client, &self.config.tables).await?;

        Ok(())
    }

    /// Get a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Db> {
        &self.client
    }

    /// Get the path where the database is stored.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the configuration this database was opened with.
    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Get a transaction manager over this database.
    ///
    /// Every manager returned here shares the same lock, so units of work
    /// never interleave.
    pub fn transactions(&self) -> TransactionManager<'_> {
        TransactionManager::new(&self.client, &self.config.tables, &self.transaction_lock)
    }

    /// Get the service layer over this database.
    pub fn service(&self) -> TodoService<'_> {
        TodoService::new(self.transactions())
    }

    /// Get the default database path based on project root.
    ///
    /// Uses `git rev-parse --show-toplevel` to find the project root and
    /// returns `<project_root>/.simpletodo/data`. If not in a git repository,
    /// falls back to `.simpletodo/data` relative to the current working
    /// directory.
    pub fn default_path() -> PathBuf {
        let base_path = find_project_root().unwrap_or_else(|| PathBuf::from("."));
        base_path.join(DEFAULT_DB_PATH)
    }

    /// Prepare the database path by creating missing directories.
    fn prepare_path(path: &Path) -> DbResult<PathBuf> {
        let path = path.to_path_buf();

        if !path.exists() {
            std::fs::create_dir_all(&path).map_err(|e| DbError::CreateDirectory {
                path: path.clone(),
                source: e,
            })?;
        }

        Ok(path)
    }
}

// Ensure Database is Send + Sync for async compatibility
static_assertions::assert_impl_all!(Database: Send, Sync);

/// Find the project root by running `git rev-parse --show-toplevel`.
///
/// Returns `Some(PathBuf)` with the absolute path to the git repository root,
/// or `None` if not in a git repository or the command fails.
pub fn find_project_root() -> Option<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()?;

    if output.status.success() {
        let path_str = String::from_utf8(output.stdout).ok()?;
        Some(PathBuf::from(path_str.trim()))
    } else {
        None
    }
}
