//! # Store Product Repository
//!
//! Stock rows: how many units of a product sit where inside a store.
//!
//! ## Duplicate Pairs
//! ```text
//! A (store, product) pair may have several rows, one per stocking location
//! or restocking event. Readers that need "the" stock of a product sum them:
//!
//!   S1 / COFFEE / 10 / Aisle 1  ┐
//!   S1 / COFFEE /  4 / Backroom ┴─► StockLevel { total_stock: 14, locations: 2 }
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use commerce_core::payload::NewStoreProduct;
use commerce_core::{StockLevel, StoreProduct};

/// Repository for store stock rows.
#[derive(Debug, Clone)]
pub struct StoreProductRepository {
    pool: SqlitePool,
}

impl StoreProductRepository {
    /// Creates a new StoreProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreProductRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<StoreProduct>> {
        let rows = sqlx::query_as::<_, StoreProduct>(
            "SELECT id, stock, address, store_id, product_id FROM store_products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<StoreProduct>> {
        let row = sqlx::query_as::<_, StoreProduct>(
            "SELECT id, stock, address, store_id, product_id FROM store_products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn insert(&self, row: &NewStoreProduct) -> DbResult<StoreProduct> {
        let address = row.address.trim();
        debug!(
            store_id = %row.store_id,
            product_id = %row.product_id,
            stock = row.stock,
            "Inserting stock row"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO store_products (stock, address, store_id, product_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(row.stock)
        .bind(address)
        .bind(&row.store_id)
        .bind(&row.product_id)
        .execute(&self.pool)
        .await?;

        Ok(StoreProduct {
            id: result.last_insert_rowid(),
            stock: row.stock,
            address: address.to_string(),
            store_id: row.store_id.clone(),
            product_id: row.product_id.clone(),
        })
    }

    pub async fn update(&self, row: &StoreProduct) -> DbResult<()> {
        debug!(id = row.id, stock = row.stock, "Updating stock row");

        let result = sqlx::query(
            r#"
            UPDATE store_products SET
                stock = ?2,
                address = ?3,
                store_id = ?4,
                product_id = ?5
            WHERE id = ?1
            "#,
        )
        .bind(row.id)
        .bind(row.stock)
        .bind(&row.address)
        .bind(&row.store_id)
        .bind(&row.product_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("StoreProduct", row.id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting stock row");

        let result = sqlx::query("DELETE FROM store_products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("StoreProduct", id));
        }

        Ok(())
    }

    /// Every stock row of a store, duplicates included.
    pub async fn find_by_store(&self, store_id: &str) -> DbResult<Vec<StoreProduct>> {
        let rows = sqlx::query_as::<_, StoreProduct>(
            r#"
            SELECT id, stock, address, store_id, product_id
            FROM store_products
            WHERE store_id = ?1
            ORDER BY id
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-product stock of a store, summed across duplicate rows.
    pub async fn stock_levels_for_store(&self, store_id: &str) -> DbResult<Vec<StockLevel>> {
        debug!(store_id = %store_id, "Summing stock levels");

        let levels = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT
                p.id AS product_id,
                p.name AS product_name,
                SUM(sp.stock) AS total_stock,
                COUNT(*) AS locations
            FROM store_products sp
            JOIN products p ON p.id = sp.product_id
            WHERE sp.store_id = ?1
            GROUP BY p.id, p.name
            ORDER BY p.name, p.id
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;

    fn row(store_id: &str, product_id: &str, stock: i64, address: &str) -> NewStoreProduct {
        NewStoreProduct {
            stock,
            address: address.to_string(),
            store_id: store_id.to_string(),
            product_id: product_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_pairs_are_legal_and_summed() {
        let db = fixtures::db().await;
        let city = fixtures::city(&db, "Medellín").await;
        let store = fixtures::store(&db, "Centro", city).await;
        let coffee = fixtures::product(&db, "Coffee", 1200).await;
        let tea = fixtures::product(&db, "Tea", 800).await;

        let repo = db.store_products();
        repo.insert(&row(&store.id, &coffee.id, 10, "Aisle 1")).await.unwrap();
        repo.insert(&row(&store.id, &coffee.id, 4, "Backroom")).await.unwrap();
        repo.insert(&row(&store.id, &tea.id, 7, "Aisle 2")).await.unwrap();

        assert_eq!(repo.find_by_store(&store.id).await.unwrap().len(), 3);

        let levels = repo.stock_levels_for_store(&store.id).await.unwrap();
        assert_eq!(
            levels,
            vec![
                StockLevel {
                    product_id: coffee.id.clone(),
                    product_name: "Coffee".to_string(),
                    total_stock: 14,
                    locations: 2,
                },
                StockLevel {
                    product_id: tea.id.clone(),
                    product_name: "Tea".to_string(),
                    total_stock: 7,
                    locations: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_negative_stock_violates_check() {
        let db = fixtures::db().await;
        let city = fixtures::city(&db, "Cali").await;
        let store = fixtures::store(&db, "Sur", city).await;
        let coffee = fixtures::product(&db, "Coffee", 1200).await;

        let err = db
            .store_products()
            .insert(&row(&store.id, &coffee.id, -1, "Shelf"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = fixtures::db().await;
        let city = fixtures::city(&db, "Cali").await;
        let store = fixtures::store(&db, "Sur", city).await;
        let coffee = fixtures::product(&db, "Coffee", 1200).await;

        let repo = db.store_products();
        let mut stock = repo.insert(&row(&store.id, &coffee.id, 3, "Shelf")).await.unwrap();
        stock.stock = 0;
        repo.update(&stock).await.unwrap();
        assert_eq!(repo.get_by_id(stock.id).await.unwrap(), Some(stock.clone()));

        repo.delete(stock.id).await.unwrap();
        assert!(matches!(
            repo.delete(stock.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
