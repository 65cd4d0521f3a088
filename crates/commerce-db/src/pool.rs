//! # Connection Pool
//!
//! Opens the SQLite file, applies the connection pragmas the schema relies
//! on, and hands out repositories over the shared pool.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Opening the Store                               │
//! │                                                                         │
//! │  AppConfig [database]                                                   │
//! │       │  to_db_config()                                                 │
//! │       ▼                                                                 │
//! │  DbConfig { path, pool bounds, timeouts }                               │
//! │       │  Database::new(config)                                          │
//! │       ▼                                                                 │
//! │  connect_options()  ──► foreign_keys=ON, WAL, synchronous=NORMAL        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqlitePool (min..=max connections) ──► embedded migrations             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.categories() · db.products() · db.sale_products() · ...             │
//! │  (each accessor clones the pool handle; no other state)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `foreign_keys` must be on for every connection: the schema declares all
//! parent links `ON DELETE RESTRICT`, and deletes of referenced rows rely on
//! SQLite refusing them.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations::{self, MigrationStatus};
use crate::repository::{
    CategoryRepository, CityRepository, DepartmentRepository, ProductRepository,
    SaleProductRepository, SaleRepository, StoreProductRepository, StoreRepository,
    UserRepository, UserRoleRepository,
};

/// Path value that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Pool settings.
///
/// ```rust,ignore
/// let config = DbConfig::new("commerce.db")
///     .max_connections(8)
///     .idle_timeout(Duration::from_secs(120));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, created on first open. [`IN_MEMORY`] for a throwaway store.
    pub database_path: PathBuf,

    /// Upper bound on pooled connections.
    pub max_connections: u32,

    /// Connections kept open while idle.
    pub min_connections: u32,

    /// How long `acquire` waits for a free connection.
    pub connect_timeout: Duration,

    /// Idle connections above `min_connections` are closed after this.
    pub idle_timeout: Duration,

    /// Apply embedded migrations as part of [`Database::new`].
    pub run_migrations: bool,
}

impl DbConfig {
    /// Defaults: 5 connections max, 1 min, 30 s acquire, 10 min idle.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// A fresh, migrated, private database per pool. Used by tests.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to exactly one connection.
    pub fn in_memory() -> Self {
        DbConfig::new(IN_MEMORY)
            .max_connections(1)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(5))
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// True when the path selects an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY)
    }
}

/// Per-connection options: pragmas plus file handling.
fn connect_options(config: &DbConfig) -> DbResult<SqliteConnectOptions> {
    let options = if config.is_in_memory() {
        SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
    } else {
        SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
    };

    Ok(options.foreign_keys(true))
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the commerce store.
///
/// Clones share one pool. Repository accessors are free to call per
/// operation.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, applies pending migrations.
    ///
    /// ## Errors
    /// * `DbError::ConnectionFailed` - file cannot be opened or created
    /// * `DbError::MigrationFailed` - an embedded migration was rejected
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Opening commerce database"
        );

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout);

        // Closing the only in-memory connection would drop the database.
        pool_options = if config.is_in_memory() {
            pool_options.idle_timeout(None).max_lifetime(None)
        } else {
            pool_options.idle_timeout(Some(config.idle_timeout))
        };

        let pool = pool_options
            .connect_with(connect_options(&config)?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!("Connection pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies embedded migrations not yet recorded in `_sqlx_migrations`.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Embedded vs applied migration counts.
    pub async fn migration_status(&self) -> DbResult<MigrationStatus> {
        migrations::migration_status(&self.pool).await
    }

    /// Raw pool, for queries no repository owns.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    pub fn departments(&self) -> DepartmentRepository {
        DepartmentRepository::new(self.pool.clone())
    }

    pub fn cities(&self) -> CityRepository {
        CityRepository::new(self.pool.clone())
    }

    /// Categories and the product-category links.
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// ```rust,ignore
    /// let cheap = db.products().find_by_price_range(0, 500).await?;
    /// ```
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn stores(&self) -> StoreRepository {
        StoreRepository::new(self.pool.clone())
    }

    /// Stock rows; also computes per-store stock levels.
    pub fn store_products(&self) -> StoreProductRepository {
        StoreProductRepository::new(self.pool.clone())
    }

    pub fn user_roles(&self) -> UserRoleRepository {
        UserRoleRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Sale lines; also hosts the best-seller aggregation.
    pub fn sale_products(&self) -> SaleProductRepository {
        SaleProductRepository::new(self.pool.clone())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Closes every pooled connection. Later repository calls fail.
    pub async fn close(&self) {
        info!("Closing commerce database");
        self.pool.close().await;
    }

    /// `true` when a trivial query round-trips.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_healthy_and_current() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let status = db.migration_status().await.unwrap();
        assert!(status.embedded > 0);
        assert!(status.is_current());
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let on: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(on, 1);
    }

    #[tokio::test]
    async fn test_without_migrations_nothing_is_applied() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let status = db.migration_status().await.unwrap();
        assert_eq!(status.applied, 0);
        assert!(!status.is_current());

        db.run_migrations().await.unwrap();
        assert!(db.migration_status().await.unwrap().is_current());
    }

    #[tokio::test]
    async fn test_closed_database_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("shop.db")
            .max_connections(10)
            .min_connections(2)
            .idle_timeout(Duration::from_secs(30));

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.idle_timeout, Duration::from_secs(30));
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
