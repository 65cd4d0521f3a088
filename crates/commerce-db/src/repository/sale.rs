//! # Sale Repository
//!
//! Database operations for sales and date totals.
//!
//! ## Date Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Summing total_amount                              │
//! │                                                                         │
//! │  sum_total_at(instant)                                                  │
//! │     WHERE sale_date = instant           (exact instant match)           │
//! │                                                                         │
//! │  sum_total_between(start, end)                                          │
//! │     WHERE sale_date >= start AND sale_date < end                        │
//! │                                                                         │
//! │  Both: COALESCE(SUM(total_amount), 0), so no match → 0, never NULL      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `sale_date` is written once by `insert`; `update` never touches it.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use commerce_core::Sale;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists every sale, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT id, sale_date, total_amount, user_id FROM sales ORDER BY sale_date DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT id, sale_date, total_amount, user_id FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Checks whether a sale exists.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Inserts a sale.
    pub async fn insert(&self, sale: &Sale) -> DbResult<Sale> {
        debug!(id = %sale.id, user_id = %sale.user_id, total = sale.total_amount, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (id, sale_date, total_amount, user_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.sale_date)
        .bind(sale.total_amount)
        .bind(&sale.user_id)
        .execute(&self.pool)
        .await?;

        Ok(sale.clone())
    }

    /// Updates the total and buyer of a sale.
    pub async fn update(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, total = sale.total_amount, "Updating sale");

        let result = sqlx::query("UPDATE sales SET total_amount = ?2, user_id = ?3 WHERE id = ?1")
            .bind(&sale.id)
            .bind(sale.total_amount)
            .bind(&sale.user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", &sale.id));
        }

        Ok(())
    }

    /// Deletes a sale. Restricted while it has lines.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    /// Sales bought by a user, oldest first.
    pub async fn find_by_user_id(&self, user_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, sale_date, total_amount, user_id
            FROM sales
            WHERE user_id = ?1
            ORDER BY sale_date, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Sales bought by any user with exactly this first name.
    pub async fn find_by_user_first_name(&self, first_name: &str) -> DbResult<Vec<Sale>> {
        debug!(first_name = %first_name, "Listing sales by buyer first name");

        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT s.id, s.sale_date, s.total_amount, s.user_id
            FROM sales s
            JOIN users u ON u.id = s.user_id
            WHERE u.first_name = ?1
            ORDER BY s.sale_date, s.id
            "#,
        )
        .bind(first_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Sales with `total_amount > threshold`.
    pub async fn find_with_total_greater_than(&self, threshold: i64) -> DbResult<Vec<Sale>> {
        debug!(threshold = threshold, "Listing sales above threshold");

        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, sale_date, total_amount, user_id
            FROM sales
            WHERE total_amount > ?1
            ORDER BY total_amount, id
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Sum of `total_amount` over sales dated exactly `instant`.
    pub async fn sum_total_at(&self, instant: DateTime<Utc>) -> DbResult<i64> {
        debug!(instant = %instant, "Summing sales at instant");

        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount), 0) FROM sales WHERE sale_date = ?1",
        )
        .bind(instant)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Sum of `total_amount` over sales dated in `[start, end)`.
    pub async fn sum_total_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<i64> {
        debug!(start = %start, end = %end, "Summing sales in range");

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM sales
            WHERE sale_date >= ?1 AND sale_date < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
