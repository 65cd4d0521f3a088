//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations
//! - Inclusive price-range filter and price-sorted listings
//! - Created-after filter
//! - Products stocked by a store (through `store_products`)
//!
//! ## Store Projection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Products by Store                                    │
//! │                                                                         │
//! │  store_products (one row per stocking location)                         │
//! │  ┌──────────┬──────────┬───────┬──────────┐                             │
//! │  │ store_id │ product  │ stock │ address  │                             │
//! │  │ S1       │ COFFEE   │ 10    │ Aisle 1  │ ← same product twice        │
//! │  │ S1       │ COFFEE   │ 4     │ Backroom │                             │
//! │  │ S1       │ TEA      │ 7     │ Aisle 2  │                             │
//! │  └──────────┴──────────┴───────┴──────────┘                             │
//! │       │                                                                 │
//! │       │  WHERE EXISTS (...)  (each product once)                        │
//! │       ▼                                                                 │
//! │  [COFFEE, TEA]                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use commerce_core::{Product, SortOrder};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.get_by_id("uuid-here").await?;
/// let cheap = repo.find_by_price_range(0, 500).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, created_at, updated_at
            FROM products
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Checks whether a product exists.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (id and timestamps set by the caller)
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates an existing product.
    ///
    /// `created_at` is never written.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Fails with `ForeignKeyViolation` while stock rows, sale lines or
    /// category links still reference it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Products with `min <= price_cents <= max`, cheapest first.
    pub async fn find_by_price_range(&self, min: i64, max: i64) -> DbResult<Vec<Product>> {
        debug!(min = min, max = max, "Filtering products by price");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, created_at, updated_at
            FROM products
            WHERE price_cents BETWEEN ?1 AND ?2
            ORDER BY price_cents, id
            "#,
        )
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Every product sorted by price.
    ///
    /// Ties are broken by id in the same direction, so the descending
    /// listing is exactly the ascending one reversed.
    pub async fn list_by_price(&self, order: SortOrder) -> DbResult<Vec<Product>> {
        debug!(order = ?order, "Listing products by price");

        let sql = match order {
            SortOrder::Asc => {
                r#"
                SELECT id, name, description, price_cents, created_at, updated_at
                FROM products
                ORDER BY price_cents ASC, id ASC
                "#
            }
            SortOrder::Desc => {
                r#"
                SELECT id, name, description, price_cents, created_at, updated_at
                FROM products
                ORDER BY price_cents DESC, id DESC
                "#
            }
        };

        let products = sqlx::query_as::<_, Product>(sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Products created strictly after `after`, oldest first.
    pub async fn find_created_after(&self, after: DateTime<Utc>) -> DbResult<Vec<Product>> {
        debug!(after = %after, "Filtering products by creation time");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, created_at, updated_at
            FROM products
            WHERE created_at > ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(after)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Distinct products with at least one stock row in the store.
    pub async fn find_by_store_id(&self, store_id: &str) -> DbResult<Vec<Product>> {
        debug!(store_id = %store_id, "Listing products by store id");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price_cents, p.created_at, p.updated_at
            FROM products p
            WHERE EXISTS (
                SELECT 1 FROM store_products sp
                WHERE sp.product_id = p.id AND sp.store_id = ?1
            )
            ORDER BY p.name, p.id
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Distinct products stocked by any store with the given name.
    pub async fn find_by_store_name(&self, store_name: &str) -> DbResult<Vec<Product>> {
        debug!(store_name = %store_name, "Listing products by store name");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price_cents, p.created_at, p.updated_at
            FROM products p
            WHERE EXISTS (
                SELECT 1 FROM store_products sp
                JOIN stores s ON s.id = sp.store_id
                WHERE sp.product_id = p.id AND s.name = ?1
            )
            ORDER BY p.name, p.id
            "#,
        )
        .bind(store_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts total products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{self, ts};
    use commerce_core::payload::NewStoreProduct;

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = fixtures::db().await;
        let created = fixtures::product(&db, "Coffee", 1200).await;

        let fetched = db.products().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(db.products().exists(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let db = fixtures::db().await;
        let ghost = Product {
            id: "00000000-0000-0000-0000-000000000000".to_string(),
            name: "Ghost".to_string(),
            description: "-".to_string(),
            price_cents: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let err = db.products().update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_never_touches_created_at() {
        let db = fixtures::db().await;
        let mut product = fixtures::product(&db, "Coffee", 1200).await;
        let original_created = product.created_at;

        product.created_at = ts("2030-01-01T00:00:00Z");
        product.updated_at = ts("2026-06-01T00:00:00Z");
        product.price_cents = 1300;
        db.products().update(&product).await.unwrap();

        let fetched = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.created_at, original_created);
        assert_eq!(fetched.updated_at, ts("2026-06-01T00:00:00Z"));
        assert_eq!(fetched.price_cents, 1300);
    }

    #[tokio::test]
    async fn test_price_range_is_inclusive() {
        let db = fixtures::db().await;
        for (name, price) in [("A", 50), ("B", 100), ("C", 300), ("D", 500), ("E", 501)] {
            fixtures::product(&db, name, price).await;
        }

        let found = db.products().find_by_price_range(100, 500).await.unwrap();
        let prices: Vec<i64> = found.iter().map(|p| p.price_cents).collect();
        assert_eq!(prices, vec![100, 300, 500]);
    }

    #[tokio::test]
    async fn test_price_listings_are_reverses() {
        let db = fixtures::db().await;
        for (name, price) in [("A", 300), ("B", 100), ("C", 300), ("D", 200)] {
            fixtures::product(&db, name, price).await;
        }

        let asc = db.products().list_by_price(SortOrder::Asc).await.unwrap();
        let mut desc = db.products().list_by_price(SortOrder::Desc).await.unwrap();
        desc.reverse();

        assert_eq!(asc, desc);
        assert!(asc.windows(2).all(|w| w[0].price_cents <= w[1].price_cents));
    }

    #[tokio::test]
    async fn test_created_after_is_strict() {
        let db = fixtures::db().await;
        let cutoff = ts("2026-03-01T12:00:00Z");
        fixtures::product_at(&db, "Old", 1, ts("2026-02-01T00:00:00Z")).await;
        fixtures::product_at(&db, "Exact", 1, cutoff).await;
        let newer = fixtures::product_at(&db, "New", 1, ts("2026-03-01T12:00:00.000001Z")).await;

        let found = db.products().find_created_after(cutoff).await.unwrap();
        assert_eq!(found, vec![newer]);
    }

    #[tokio::test]
    async fn test_products_by_store_are_distinct() {
        let db = fixtures::db().await;
        let city = fixtures::city(&db, "Medellín").await;
        let store = fixtures::store(&db, "Centro", city).await;
        let other = fixtures::store(&db, "Norte", city).await;
        let coffee = fixtures::product(&db, "Coffee", 1200).await;
        let tea = fixtures::product(&db, "Tea", 800).await;
        fixtures::product(&db, "Unstocked", 100).await;

        for (product, s, address) in [
            (&coffee, &store, "Aisle 1"),
            (&coffee, &store, "Backroom"),
            (&tea, &other, "Aisle 2"),
        ] {
            db.store_products()
                .insert(&NewStoreProduct {
                    stock: 5,
                    address: address.to_string(),
                    store_id: s.id.clone(),
                    product_id: product.id.clone(),
                })
                .await
                .unwrap();
        }

        let by_id = db.products().find_by_store_id(&store.id).await.unwrap();
        assert_eq!(by_id, vec![coffee.clone()]);

        let by_name = db.products().find_by_store_name("Norte").await.unwrap();
        assert_eq!(by_name, vec![tea]);

        assert!(db.products().find_by_store_name("Nowhere").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_stocked_product_is_restricted() {
        let db = fixtures::db().await;
        let city = fixtures::city(&db, "Cali").await;
        let store = fixtures::store(&db, "Sur", city).await;
        let coffee = fixtures::product(&db, "Coffee", 1200).await;
        db.store_products()
            .insert(&NewStoreProduct {
                stock: 1,
                address: "Shelf".to_string(),
                store_id: store.id.clone(),
                product_id: coffee.id.clone(),
            })
            .await
            .unwrap();

        let err = db.products().delete(&coffee.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(db.products().exists(&coffee.id).await.unwrap());
    }
}
