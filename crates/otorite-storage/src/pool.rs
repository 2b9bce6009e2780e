//! # Database Pool Management
//!
//! Connection pool creation and configuration for the local storage database.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Local Storage Database                             │
//! │                                                                         │
//! │  Shell startup                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageConfig::new(path) / StorageConfig::in_memory()                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::open(config).await ← Create pool + run migrations           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.local_storage() ──► LocalStorageRepository (implements            │
//! │                          DurableStore, handed to every store)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File databases use WAL mode. The in-memory database keeps a single
//! connection alive for the life of the pool, since each new SQLite memory
//! connection would start out empty.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::kv::LocalStorageRepository;
use crate::migrations;

// =============================================================================
// Configuration
// =============================================================================

/// Storage database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StorageConfig::new("/path/to/otorite.db").max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path to the SQLite file. `None` for an in-memory database.
    pub database_path: Option<PathBuf>,

    /// Maximum number of connections in the pool.
    /// Default: 4
    pub max_connections: u32,

    /// Connection timeout duration.
    /// Default: 10 seconds
    pub connect_timeout: Duration,

    /// Whether to run migrations on open.
    /// Default: true
    pub run_migrations: bool,
}

impl StorageConfig {
    /// Configuration for a file database. The file is created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StorageConfig {
            database_path: Some(path.into()),
            max_connections: 4,
            connect_timeout: Duration::from_secs(10),
            run_migrations: true,
        }
    }

    /// Configuration for a throwaway in-memory database.
    pub fn in_memory() -> Self {
        StorageConfig {
            database_path: None,
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections. Ignored for in-memory databases.
    pub fn max_connections(mut self, max: u32) -> Self {
        if self.database_path.is_some() {
            self.max_connections = max.max(1);
        }
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.is_none()
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the local storage database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database and runs migrations if enabled.
    pub async fn open(config: StorageConfig) -> StorageResult<Self> {
        let connect_options = match &config.database_path {
            Some(path) => {
                info!(path = %path.display(), "Opening local storage database");

                SqliteConnectOptions::new()
                    .filename(path)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal)
                    .create_if_missing(true)
            }
            None => {
                info!("Opening in-memory local storage database");

                SqliteConnectOptions::from_str("sqlite::memory:")
                    .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?
            }
        };

        debug!("Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout);

        if config.is_in_memory() {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Storage pool created");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs pending migrations.
    pub async fn run_migrations(&self) -> StorageResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the key/value repository backing the stores.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let storage = db.local_storage();
    /// storage.set("language", "en").await?;
    /// ```
    pub fn local_storage(&self) -> LocalStorageRepository {
        LocalStorageRepository::new(self.pool.clone())
    }

    /// Closes the pool. Every repository operation fails afterwards.
    pub async fn close(&self) {
        info!("Closing local storage database");
        self.pool.close().await;
    }

    /// Checks that the database answers queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
