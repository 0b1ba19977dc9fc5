//! # Opening the Shop Database
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig ──► Database::new ──► SqlitePool ──► migrations               │
//! │                                      │                                  │
//! │                 ┌────────────────────┼────────────────────┐             │
//! │                 ▼                    ▼                    ▼             │
//! │         ProductRepository     SaleRepository     CustomerRepository     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A file store runs in WAL mode with NORMAL synchronous and foreign keys on.
//! A memory store is pinned to one connection that is never recycled: the
//! data lives exactly as long as that connection does.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;

/// Where the shop's tables live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// SQLite file; parent directories are created on open.
    File(PathBuf),
    /// Private in-memory store, gone when the `Database` is dropped.
    Memory,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Upper bound on pooled connections for a file store. Default: 4
    pub max_connections: u32,

    /// How long to wait for a free connection. Default: 30 seconds
    pub acquire_timeout: Duration,

    /// Apply embedded migrations on open. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::at(DbLocation::File(path.into()))
    }

    pub fn in_memory() -> Self {
        Self::at(DbLocation::Memory)
    }

    fn at(location: DbLocation) -> Self {
        DbConfig {
            location,
            max_connections: 4,
            acquire_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }
}

/// Handle to the shop database. Clones share one pool.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./shopkeep.db")).await?;
/// let rice = db.products().get_by_name("rice").await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database and applies migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let pool = match &config.location {
            DbLocation::File(path) => open_file(path, &config).await?,
            DbLocation::Memory => open_memory(&config).await?,
        };

        info!(location = ?config.location, "Shop database opened");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    pub async fn in_memory() -> DbResult<Self> {
        Self::new(DbConfig::in_memory()).await
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        debug!("Schema up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    /// Waits for checked-out connections and closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Shop database closed");
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

async fn open_file(path: &Path, config: &DbConfig) -> DbResult<SqlitePool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            DbError::ConnectionFailed(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))
}

async fn open_memory(config: &DbConfig) -> DbResult<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))
}
