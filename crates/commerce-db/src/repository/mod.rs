//! # Repository Module
//!
//! One repository per table. Repositories own every SQL statement and hold
//! nothing but a clone of the pool.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  commerce-service                                                       │
//! │       │                                                                 │
//! │       │  db.products().find_by_price_range(100, 500)                    │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── list / get_by_id / exists                                          │
//! │  ├── insert(&Product) / update(&Product) / delete(id)                   │
//! │  └── named queries (price range, sorted, created after, by store)       │
//! │       │                                                                 │
//! │       │  SQL (runtime-checked query_as + FromRow)                       │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conventions
//! - `get_by_id` returns `Ok(None)` for a missing row
//! - `update` / `delete` return `DbError::NotFound` when no row matched
//! - Collections come back empty, never as an error, on no match
//! - Repositories write only the columns they are given; timestamps are
//!   assigned by the caller
//!
//! ## Available Repositories
//!
//! - [`DepartmentRepository`], [`CityRepository`] - Geography
//! - [`CategoryRepository`] - Categories and product links
//! - [`ProductRepository`] - Products and catalog queries
//! - [`StoreRepository`], [`StoreProductRepository`] - Stores and stock rows
//! - [`UserRoleRepository`], [`UserRepository`] - Identity
//! - [`SaleRepository`] - Sales and date totals
//! - [`SaleProductRepository`] - Sale lines and best sellers

use uuid::Uuid;

pub mod category;
pub mod city;
pub mod department;
pub mod product;
pub mod sale;
pub mod sale_product;
pub mod store;
pub mod store_product;
pub mod user;
pub mod user_role;

pub use category::CategoryRepository;
pub use city::CityRepository;
pub use department::DepartmentRepository;
pub use product::ProductRepository;
pub use sale::SaleRepository;
pub use sale_product::SaleProductRepository;
pub use store::StoreRepository;
pub use store_product::StoreProductRepository;
pub use user::UserRepository;
pub use user_role::UserRoleRepository;

/// Generates a new hyphenated UUID v4 for Product, Store, Sale and User rows.
///
/// ## Usage
/// ```rust,ignore
/// let product = new_product.into_product(generate_id(), now);
/// ```
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod fixtures {
    //! Row builders shared by the repository tests.

    use chrono::{DateTime, Utc};
    use commerce_core::payload::{NewCity, NewDepartment, NewUserRole};
    use commerce_core::{Product, Role, Sale, Store, User};

    use super::generate_id;
    use crate::{Database, DbConfig};

    pub async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    pub async fn product(db: &Database, name: &str, price_cents: i64) -> Product {
        product_at(db, name, price_cents, ts("2026-01-01T00:00:00Z")).await
    }

    pub async fn product_at(
        db: &Database,
        name: &str,
        price_cents: i64,
        created_at: DateTime<Utc>,
    ) -> Product {
        let product = Product {
            id: generate_id(),
            name: name.to_string(),
            description: format!("{name} description"),
            price_cents,
            created_at,
            updated_at: created_at,
        };
        db.products().insert(&product).await.unwrap()
    }

    /// Creates a department and a city, returning the city id.
    pub async fn city(db: &Database, name: &str) -> i64 {
        let department = db
            .departments()
            .insert(&NewDepartment {
                name: format!("{name} Department"),
            })
            .await
            .unwrap();
        db.cities()
            .insert(&NewCity {
                name: name.to_string(),
                department_id: department.id,
            })
            .await
            .unwrap()
            .id
    }

    pub async fn store(db: &Database, name: &str, city_id: i64) -> Store {
        let store = Store {
            id: generate_id(),
            name: name.to_string(),
            city_id,
        };
        db.stores().insert(&store).await.unwrap()
    }

    pub async fn user(db: &Database, username: &str, first_name: &str, city_id: i64) -> User {
        let role = db
            .user_roles()
            .insert(&NewUserRole { role: Role::User })
            .await
            .unwrap();
        let user = User {
            id: generate_id(),
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            phone: "3001234567".to_string(),
            created_at: ts("2026-01-01T00:00:00Z"),
            role_id: role.id,
            city_id,
        };
        db.users().insert(&user).await.unwrap()
    }

    pub async fn sale(db: &Database, user_id: &str, total: i64, at: &str) -> Sale {
        let sale = Sale {
            id: generate_id(),
            sale_date: ts(at),
            total_amount: total,
            user_id: user_id.to_string(),
        };
        db.sales().insert(&sale).await.unwrap()
    }
}
