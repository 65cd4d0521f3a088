//! # commerce-service: Module Services for Commerce Manager
//!
//! The CRUD and named-query operations external callers use, grouped by
//! module, plus configuration and tracing setup.
//!
//! ## Module Organization
//! ```text
//! commerce_service/
//! ├── lib.rs          ◄─── You are here (Commerce handle)
//! ├── config.rs       ◄─── AppConfig (commerce.toml + env)
//! ├── telemetry.rs    ◄─── tracing-subscriber setup
//! ├── error.rs        ◄─── ServiceError + ErrorCode
//! ├── geography.rs    ◄─── Departments, cities
//! ├── catalog.rs      ◄─── Categories, products, links
//! ├── inventory.rs    ◄─── Stores, stock rows
//! ├── identity.rs     ◄─── Roles, users, passwords
//! ├── sales.rs        ◄─── Sales, sale lines, date totals
//! └── analytics.rs    ◄─── Best sellers
//! ```
//!
//! ## Service Handles
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Commerce                                       │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐                     │
//! │  │  Geography   │ │   Catalog    │ │  Inventory   │                     │
//! │  └──────┬───────┘ └──────┬───────┘ └──────┬───────┘                     │
//! │  ┌──────┴───────┐ ┌──────┴───────┐ ┌──────┴───────┐                     │
//! │  │  Identity    │ │    Sales     │ │  Analytics   │                     │
//! │  └──────┬───────┘ └──────┬───────┘ └──────┬───────┘                     │
//! │         └────────────────┼────────────────┘                             │
//! │                          ▼                                              │
//! │              Database (shared SqlitePool)                               │
//! │                                                                         │
//! │  Every service is a cheap Clone over the same pool. No service holds    │
//! │  mutable state; each call is independent.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use commerce_service::{AppConfig, Commerce};
//!
//! let config = AppConfig::load(None)?;
//! let commerce = Commerce::connect(&config).await?;
//!
//! let top = commerce.analytics().best_sellers(Some(10)).await?;
//! ```

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geography;
pub mod identity;
pub mod inventory;
pub mod sales;
pub mod telemetry;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::info;

use commerce_db::Database;

pub use analytics::AnalyticsService;
pub use catalog::CatalogService;
pub use config::{AppConfig, ConfigError};
pub use error::{ErrorBody, ErrorCode, ServiceError, ServiceResult};
pub use geography::GeographyService;
pub use identity::IdentityService;
pub use inventory::InventoryService;
pub use sales::SalesService;

/// Current time at the precision timestamps are stored with.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Entry point bundling every module service over one database.
#[derive(Debug, Clone)]
pub struct Commerce {
    db: Database,
    max_top_sellers: i64,
}

impl Commerce {
    /// Opens the configured database (running migrations) and builds the
    /// services.
    pub async fn connect(config: &AppConfig) -> ServiceResult<Self> {
        let path = &config.database.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ServiceError::Storage(commerce_db::DbError::ConnectionFailed(format!(
                    "Cannot create {}: {e}",
                    parent.display()
                )))
            })?;
        }

        let db = Database::new(config.to_db_config()).await?;
        info!(path = %path.display(), "Commerce services ready");

        Ok(Self::from_database(db, config.analytics.max_top_sellers))
    }

    /// Builds the services over an existing database handle.
    pub fn from_database(db: Database, max_top_sellers: i64) -> Self {
        Commerce {
            db,
            max_top_sellers,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn geography(&self) -> GeographyService {
        GeographyService::new(self.db.clone())
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.db.clone())
    }

    pub fn inventory(&self) -> InventoryService {
        InventoryService::new(self.db.clone())
    }

    pub fn identity(&self) -> IdentityService {
        IdentityService::new(self.db.clone())
    }

    pub fn sales(&self) -> SalesService {
        SalesService::new(self.db.clone())
    }

    pub fn analytics(&self) -> AnalyticsService {
        AnalyticsService::new(self.db.clone(), self.max_top_sellers)
    }
}
