//! # commerce-db: Database Layer for Commerce Manager
//!
//! SQLite storage for the commerce domain, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Commerce Manager Data Flow                          │
//! │                                                                         │
//! │  commerce-service (CatalogService::products_by_price_range)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    commerce-db (THIS CRATE)                     │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌───────────────┐   │    │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations   │   │    │
//! │  │   │   (pool.rs)   │    │ (repository/)  │   │  (embedded)   │   │    │
//! │  │   │               │    │                │   │               │   │    │
//! │  │   │ SqlitePool    │◄───│ ProductRepo    │   │ 001_initial_  │   │    │
//! │  │   │ WAL, FKs on   │    │ SaleProductRepo│   │     schema    │   │    │
//! │  │   │               │    │ UserRepo ...   │   │ 002_query_    │   │    │
//! │  │   └───────────────┘    └────────────────┘   │     indexes   │   │    │
//! │  │                                             └───────────────┘   │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     SQLite Database                             │    │
//! │  │          <platform data dir>/commerce.db or :memory:            │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use commerce_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/commerce.db")).await?;
//!
//! let top = db.sale_products().best_sellers(Some(10)).await?;
//! let stock = db.store_products().stock_levels_for_store(&store_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::{
    generate_id, CategoryRepository, CityRepository, DepartmentRepository, ProductRepository,
    SaleProductRepository, SaleRepository, StoreProductRepository, StoreRepository,
    UserRepository, UserRoleRepository,
};
