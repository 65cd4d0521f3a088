//! # commerce-core: Domain Model for Commerce Manager
//!
//! Entities, transfer models, inbound payloads and validation rules, with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Commerce Manager Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │              Transport (HTTP, CLI, ...) - external              │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ CRUD + named queries                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    commerce-service                             │    │
//! │  │   geography, catalog, inventory, identity, sales, analytics     │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │             ★ commerce-core (THIS CRATE) ★                      │    │
//! │  │                                                                 │    │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌────────────┐         │    │
//! │  │   │  types  │  │   dto   │  │ payload │  │ validation │         │    │
//! │  │   │ entities│  │ outbound│  │ New*/   │  │   rules    │         │    │
//! │  │   │  Role   │  │  models │  │ *Patch  │  │            │         │    │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └────────────┘         │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                commerce-db (Database Layer)                     │    │
//! │  │             SQLite queries, migrations, repositories            │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Persistence entities (Product, Sale, User, ...)
//! - [`dto`] - Transfer models with the Product/Category cycle broken
//! - [`payload`] - Create payloads and find-then-merge patches
//! - [`money`] - Integer money
//! - [`error`] - Validation errors
//! - [`validation`] - Field and query-parameter rules
//!
//! ## Example Usage
//!
//! ```rust
//! use commerce_core::payload::ProductPatch;
//! use commerce_core::validation::validate_price_range;
//!
//! assert!(validate_price_range(100, 500).is_ok());
//!
//! let patch = ProductPatch { price: Some(1500), ..Default::default() };
//! assert!(patch.validate().is_ok());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dto;
pub mod error;
pub mod money;
pub mod payload;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of department, city, category, store and user names.
pub const MAX_NAME_LEN: usize = 64;

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 128;

/// Maximum length of a person's first or last name.
pub const MAX_PERSON_NAME_LEN: usize = 32;

/// Maximum number of digits in a phone number.
pub const MAX_PHONE_DIGITS: usize = 10;

/// Default cap on the best-seller `limit` parameter.
///
/// Overridable through `[analytics] max_top_sellers` in commerce.toml.
pub const DEFAULT_MAX_TOP_SELLERS: i64 = 100;
