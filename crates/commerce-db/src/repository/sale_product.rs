//! # Sale Product Repository
//!
//! Sale lines and the best-seller aggregation.
//!
//! ## Best-Seller Ranking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sale_products                        ranking                           │
//! │  ┌─────────┬──────────┐                                                 │
//! │  │ product │ quantity │   GROUP BY product_id                           │
//! │  │ A       │ 5        │   SUM(quantity)        A: 7                     │
//! │  │ B       │ 3        │ ─────────────────────► B: 3                     │
//! │  │ A       │ 2        │   ORDER BY SUM DESC,                            │
//! │  └─────────┴──────────┘            id ASC      LIMIT n                  │
//! │                                                                         │
//! │  One statement. Products without lines never appear.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use commerce_core::payload::NewSaleProduct;
use commerce_core::{Product, ProductSales, SaleProduct};

/// One row of the ranking query: the product columns plus its total.
#[derive(Debug, FromRow)]
struct ProductSalesRow {
    #[sqlx(flatten)]
    product: Product,
    units_sold: i64,
}

impl From<ProductSalesRow> for ProductSales {
    fn from(row: ProductSalesRow) -> Self {
        ProductSales {
            product: row.product,
            units_sold: row.units_sold,
        }
    }
}

/// Repository for sale lines.
#[derive(Debug, Clone)]
pub struct SaleProductRepository {
    pool: SqlitePool,
}

impl SaleProductRepository {
    /// Creates a new SaleProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleProductRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<SaleProduct>> {
        let lines = sqlx::query_as::<_, SaleProduct>(
            "SELECT id, quantity, sale_id, product_id FROM sale_products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SaleProduct>> {
        let line = sqlx::query_as::<_, SaleProduct>(
            "SELECT id, quantity, sale_id, product_id FROM sale_products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(line)
    }

    pub async fn insert(&self, line: &NewSaleProduct) -> DbResult<SaleProduct> {
        debug!(
            sale_id = %line.sale_id,
            product_id = %line.product_id,
            quantity = line.quantity,
            "Inserting sale line"
        );

        let result = sqlx::query(
            "INSERT INTO sale_products (quantity, sale_id, product_id) VALUES (?1, ?2, ?3)",
        )
        .bind(line.quantity)
        .bind(&line.sale_id)
        .bind(&line.product_id)
        .execute(&self.pool)
        .await?;

        Ok(SaleProduct {
            id: result.last_insert_rowid(),
            quantity: line.quantity,
            sale_id: line.sale_id.clone(),
            product_id: line.product_id.clone(),
        })
    }

    pub async fn update(&self, line: &SaleProduct) -> DbResult<()> {
        debug!(id = line.id, quantity = line.quantity, "Updating sale line");

        let result = sqlx::query(
            r#"
            UPDATE sale_products SET
                quantity = ?2,
                sale_id = ?3,
                product_id = ?4
            WHERE id = ?1
            "#,
        )
        .bind(line.id)
        .bind(line.quantity)
        .bind(&line.sale_id)
        .bind(&line.product_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SaleProduct", line.id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting sale line");

        let result = sqlx::query("DELETE FROM sale_products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SaleProduct", id));
        }

        Ok(())
    }

    /// Lines of one sale in insertion order.
    pub async fn find_by_sale(&self, sale_id: &str) -> DbResult<Vec<SaleProduct>> {
        let lines = sqlx::query_as::<_, SaleProduct>(
            r#"
            SELECT id, quantity, sale_id, product_id
            FROM sale_products
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Products ranked by units sold, best first.
    ///
    /// `None` returns the full ranking. The caller validates `limit`.
    pub async fn best_sellers(&self, limit: Option<i64>) -> DbResult<Vec<Product>> {
        Ok(self
            .best_seller_report(limit)
            .await?
            .into_iter()
            .map(|row| row.product)
            .collect())
    }

    /// Products ranked by units sold, each with its total.
    pub async fn best_seller_report(&self, limit: Option<i64>) -> DbResult<Vec<ProductSales>> {
        debug!(limit = ?limit, "Ranking best sellers");

        // LIMIT -1 means "no limit" in SQLite.
        let rows = sqlx::query_as::<_, ProductSalesRow>(
            r#"
            SELECT
                p.id, p.name, p.description, p.price_cents, p.created_at, p.updated_at,
                SUM(sp.quantity) AS units_sold
            FROM sale_products sp
            JOIN products p ON p.id = sp.product_id
            GROUP BY p.id
            ORDER BY units_sold DESC, p.id ASC
            LIMIT ?1
            "#,
        )
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Best sellers ranked");
        Ok(rows.into_iter().map(ProductSales::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;
    use commerce_core::Sale;

    struct World {
        db: crate::Database,
        sale: Sale,
    }

    async fn world() -> World {
        let db = fixtures::db().await;
        let city = fixtures::city(&db, "Cali").await;
        let ana = fixtures::user(&db, "ana", "Ana", city).await;
        let sale = fixtures::sale(&db, &ana.id, 1000, "2026-04-10T10:00:00Z").await;
        World { db, sale }
    }

    async fn line(w: &World, product: &Product, quantity: i64) -> SaleProduct {
        w.db.sale_products()
            .insert(&NewSaleProduct {
                quantity,
                sale_id: w.sale.id.clone(),
                product_id: product.id.clone(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_best_sellers_sum_duplicate_lines() {
        let w = world().await;
        let a = fixtures::product(&w.db, "A", 100).await;
        let b = fixtures::product(&w.db, "B", 100).await;
        let unsold = fixtures::product(&w.db, "Unsold", 100).await;
        line(&w, &a, 5).await;
        line(&w, &b, 3).await;
        line(&w, &a, 2).await;

        let repo = w.db.sale_products();
        let ranking = repo.best_sellers(None).await.unwrap();
        assert_eq!(ranking, vec![a.clone(), b.clone()]);
        assert!(!ranking.contains(&unsold));

        assert_eq!(repo.best_sellers(Some(1)).await.unwrap(), vec![a.clone()]);
        assert!(repo.best_sellers(Some(0)).await.unwrap().is_empty());

        let report = repo.best_seller_report(None).await.unwrap();
        let units: Vec<i64> = report.iter().map(|r| r.units_sold).collect();
        assert_eq!(units, vec![7, 3]);
    }

    #[tokio::test]
    async fn test_ties_break_by_product_id() {
        let w = world().await;
        let x = fixtures::product(&w.db, "X", 100).await;
        let y = fixtures::product(&w.db, "Y", 100).await;
        line(&w, &x, 4).await;
        line(&w, &y, 4).await;

        let mut expected = vec![x, y];
        expected.sort_by(|l, r| l.id.cmp(&r.id));
        assert_eq!(w.db.sale_products().best_sellers(None).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_lines_for_sale_and_restrict() {
        let w = world().await;
        let a = fixtures::product(&w.db, "A", 100).await;
        let first = line(&w, &a, 1).await;
        let second = line(&w, &a, 2).await;

        let lines = w.db.sale_products().find_by_sale(&w.sale.id).await.unwrap();
        assert_eq!(lines, vec![first, second]);

        let err = w.db.sales().delete(&w.sale.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_zero_quantity_violates_check() {
        let w = world().await;
        let a = fixtures::product(&w.db, "A", 100).await;
        let err = w
            .db
            .sale_products()
            .insert(&NewSaleProduct {
                quantity: 0,
                sale_id: w.sale.id.clone(),
                product_id: a.id.clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }
}
