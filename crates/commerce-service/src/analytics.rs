//! # Analytics Service
//!
//! Best-seller ranking over every sale line.
//!
//! ## Ranking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sale_products            GROUP BY product_id        ORDER BY           │
//! │  ─────────────            ───────────────────        ────────           │
//! │  A  qty 5                 A  units_sold 7            1. A (7)           │
//! │  B  qty 3      ───►       B  units_sold 3   ───►     2. B (3)           │
//! │  A  qty 2                                                               │
//! │                                                                         │
//! │  Ties break on product id ascending. Products never sold are absent.    │
//! │  One SQL statement; nothing is aggregated in memory.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use commerce_core::dto::{BestSellerDto, ProductDto};
use commerce_core::validation::validate_top_limit;
use commerce_db::Database;
use tracing::debug;

use crate::error::ServiceResult;

#[derive(Debug, Clone)]
pub struct AnalyticsService {
    db: Database,
    max_top_sellers: i64,
}

impl AnalyticsService {
    /// `max_top_sellers` caps the `limit` callers may request.
    pub fn new(db: Database, max_top_sellers: i64) -> Self {
        AnalyticsService {
            db,
            max_top_sellers,
        }
    }

    /// Products ranked by units sold, optionally capped to the top `limit`.
    ///
    /// ## Errors
    /// Validation when `limit` is negative or above the configured cap.
    /// A limit of zero yields an empty list.
    pub async fn best_sellers(&self, limit: Option<i64>) -> ServiceResult<Vec<ProductDto>> {
        self.check_limit(limit)?;
        let products = self.db.sale_products().best_sellers(limit).await?;
        debug!(limit = ?limit, count = products.len(), "Ranked best sellers");
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    /// Same ranking as [`best_sellers`](Self::best_sellers) with each
    /// product's units sold.
    pub async fn best_seller_report(
        &self,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<BestSellerDto>> {
        self.check_limit(limit)?;
        let rows = self.db.sale_products().best_seller_report(limit).await?;
        Ok(rows.into_iter().map(BestSellerDto::from).collect())
    }

    fn check_limit(&self, limit: Option<i64>) -> ServiceResult<()> {
        if let Some(limit) = limit {
            validate_top_limit(limit, self.max_top_sellers)?;
        }
        Ok(())
    }
}
