//! # Sales Service
//!
//! Sales, their lines, and date totals.
//!
//! `sale_date` is stamped by [`SalesService::create_sale`] and never changes.
//! Updates may move a sale to another buyer or correct its total.
//!
//! ## Date Totals
//! ```text
//! total_sales_amount_by_date(2026-03-01T10:15:00Z)
//!     └── sales whose sale_date is exactly that instant
//!
//! total_sales_amount_on_day(2026-03-01)
//!     └── sales in [2026-03-01T00:00:00Z, 2026-03-02T00:00:00Z)
//! ```
//! Both return zero when nothing matches.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{debug, info};

use commerce_core::dto::{SaleDto, SaleProductDto};
use commerce_core::payload::{NewSale, NewSaleProduct, SalePatch, SaleProductPatch};
use commerce_core::validation::validate_uuid;
use commerce_core::{Money, ValidationError};
use commerce_db::{generate_id, Database};

use crate::error::{ServiceError, ServiceResult};
use crate::now;

#[derive(Debug, Clone)]
pub struct SalesService {
    db: Database,
}

impl SalesService {
    pub fn new(db: Database) -> Self {
        SalesService { db }
    }

    // =========================================================================
    // Sales
    // =========================================================================

    pub async fn list_sales(&self) -> ServiceResult<Vec<SaleDto>> {
        let sales = self.db.sales().list().await?;
        Ok(sales.into_iter().map(SaleDto::from).collect())
    }

    pub async fn get_sale(&self, id: &str) -> ServiceResult<SaleDto> {
        validate_uuid("id", id)?;
        self.db
            .sales()
            .get_by_id(id)
            .await?
            .map(SaleDto::from)
            .ok_or_else(|| ServiceError::not_found("Sale", id))
    }

    /// Creates a sale dated now.
    pub async fn create_sale(&self, new: NewSale) -> ServiceResult<SaleDto> {
        new.validate()?;
        self.require_user(&new.user_id).await?;

        let sale = new.into_sale(generate_id(), now());
        let sale = self.db.sales().insert(&sale).await?;
        info!(
            id = %sale.id,
            user_id = %sale.user_id,
            total = %sale.total(),
            "Sale created"
        );
        Ok(sale.into())
    }

    pub async fn update_sale(&self, id: &str, patch: SalePatch) -> ServiceResult<SaleDto> {
        validate_uuid("id", id)?;
        patch.validate()?;

        let repo = self.db.sales();
        let mut sale = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Sale", id))?;

        if let Some(user_id) = &patch.user_id {
            self.require_user(user_id).await?;
        }

        patch.apply_to(&mut sale);
        repo.update(&sale).await?;
        Ok(sale.into())
    }

    /// Fails with Conflict while the sale has lines.
    pub async fn delete_sale(&self, id: &str) -> ServiceResult<()> {
        validate_uuid("id", id)?;
        self.db.sales().delete(id).await?;
        info!(id = %id, "Sale deleted");
        Ok(())
    }

    // =========================================================================
    // Sale Queries
    // =========================================================================

    pub async fn sales_by_user_id(&self, user_id: &str) -> ServiceResult<Vec<SaleDto>> {
        validate_uuid("user_id", user_id)?;
        let sales = self.db.sales().find_by_user_id(user_id).await?;
        Ok(sales.into_iter().map(SaleDto::from).collect())
    }

    /// Sales whose buyer has exactly this first name.
    pub async fn sales_by_user_first_name(&self, first_name: &str) -> ServiceResult<Vec<SaleDto>> {
        let sales = self.db.sales().find_by_user_first_name(first_name).await?;
        Ok(sales.into_iter().map(SaleDto::from).collect())
    }

    /// Sales with `total_amount` strictly above `threshold` cents.
    pub async fn sales_with_amount_greater_than(
        &self,
        threshold: i64,
    ) -> ServiceResult<Vec<SaleDto>> {
        let sales = self.db.sales().find_with_total_greater_than(threshold).await?;
        Ok(sales.into_iter().map(SaleDto::from).collect())
    }

    /// Sum of sales dated exactly `instant`.
    pub async fn total_sales_amount_by_date(&self, instant: DateTime<Utc>) -> ServiceResult<Money> {
        let cents = self.db.sales().sum_total_at(instant).await?;
        debug!(instant = %instant, cents = cents, "Computed exact-instant total");
        Ok(Money::from_cents(cents))
    }

    /// Sum of sales on the UTC calendar day `date`.
    pub async fn total_sales_amount_on_day(&self, date: NaiveDate) -> ServiceResult<Money> {
        let next = date.succ_opt().ok_or_else(|| ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: "has no following day".to_string(),
        })?;

        let start = date.and_time(NaiveTime::MIN).and_utc();
        let end = next.and_time(NaiveTime::MIN).and_utc();

        let cents = self.db.sales().sum_total_between(start, end).await?;
        Ok(Money::from_cents(cents))
    }

    // =========================================================================
    // Sale Lines
    // =========================================================================

    pub async fn list_sale_products(&self) -> ServiceResult<Vec<SaleProductDto>> {
        let lines = self.db.sale_products().list().await?;
        Ok(lines.into_iter().map(SaleProductDto::from).collect())
    }

    pub async fn get_sale_product(&self, id: i64) -> ServiceResult<SaleProductDto> {
        self.db
            .sale_products()
            .get_by_id(id)
            .await?
            .map(SaleProductDto::from)
            .ok_or_else(|| ServiceError::not_found("SaleProduct", id))
    }

    pub async fn create_sale_product(&self, new: NewSaleProduct) -> ServiceResult<SaleProductDto> {
        new.validate()?;
        self.require_sale(&new.sale_id).await?;
        self.require_product(&new.product_id).await?;

        let line = self.db.sale_products().insert(&new).await?;
        info!(
            id = line.id,
            sale_id = %line.sale_id,
            product_id = %line.product_id,
            quantity = line.quantity,
            "Sale line created"
        );
        Ok(line.into())
    }

    pub async fn update_sale_product(
        &self,
        id: i64,
        patch: SaleProductPatch,
    ) -> ServiceResult<SaleProductDto> {
        patch.validate()?;

        let repo = self.db.sale_products();
        let mut line = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("SaleProduct", id))?;

        if let Some(sale_id) = &patch.sale_id {
            self.require_sale(sale_id).await?;
        }
        if let Some(product_id) = &patch.product_id {
            self.require_product(product_id).await?;
        }

        patch.apply_to(&mut line);
        repo.update(&line).await?;
        Ok(line.into())
    }

    pub async fn delete_sale_product(&self, id: i64) -> ServiceResult<()> {
        self.db.sale_products().delete(id).await?;
        info!(id = id, "Sale line deleted");
        Ok(())
    }

    pub async fn lines_for_sale(&self, sale_id: &str) -> ServiceResult<Vec<SaleProductDto>> {
        validate_uuid("sale_id", sale_id)?;
        let lines = self.db.sale_products().find_by_sale(sale_id).await?;
        Ok(lines.into_iter().map(SaleProductDto::from).collect())
    }

    // =========================================================================
    // Parent resolution
    // =========================================================================

    async fn require_user(&self, id: &str) -> ServiceResult<()> {
        match self.db.users().get_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("User", id)),
        }
    }

    async fn require_sale(&self, id: &str) -> ServiceResult<()> {
        if self.db.sales().exists(id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("Sale", id))
        }
    }

    async fn require_product(&self, id: &str) -> ServiceResult<()> {
        if self.db.products().exists(id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("Product", id))
        }
    }
}
