//! # Catalog Service
//!
//! Categories, products, and the many-to-many link between them.
//!
//! ## Read Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Read Paths                               │
//! │                                                                         │
//! │  get_category(id) ──────────────► CategoryDto { products: [...] }       │
//! │  products_by_category_id(id) ───► [ProductDto]                          │
//! │  products_by_category_name(n) ──► [ProductDto]                          │
//! │  categories_for_product(id) ────► [CategorySummaryDto]                  │
//! │                                                                         │
//! │  No path ever nests a product inside a category inside a product.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Product Timestamps
//! `created_at` is stamped once on create. `updated_at` is stamped on
//! create and again on every update.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use commerce_core::dto::{CategoryDto, CategorySummaryDto, ProductDto};
use commerce_core::payload::{CategoryPatch, NewCategory, NewProduct, ProductPatch};
use commerce_core::validation::{validate_price_range, validate_uuid};
use commerce_core::SortOrder;
use commerce_db::{generate_id, Database};

use crate::error::{ServiceError, ServiceResult};
use crate::now;

#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories with their products.
    pub async fn list_categories(&self) -> ServiceResult<Vec<CategoryDto>> {
        self.categories_with_products(None).await
    }

    pub async fn get_category(&self, id: i64) -> ServiceResult<CategoryDto> {
        let repo = self.db.categories();
        let category = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))?;
        let products = repo.products_for_category(id).await?;
        Ok(CategoryDto::from_parts(category, products))
    }

    /// Exact name lookup; zero or one element.
    pub async fn find_categories_by_name(&self, name: &str) -> ServiceResult<Vec<CategoryDto>> {
        self.categories_with_products(Some(name)).await
    }

    async fn categories_with_products(
        &self,
        name: Option<&str>,
    ) -> ServiceResult<Vec<CategoryDto>> {
        let grouped = self.db.categories().list_with_products(name).await?;
        Ok(grouped
            .into_iter()
            .map(|(category, products)| CategoryDto::from_parts(category, products))
            .collect())
    }

    pub async fn create_category(&self, new: NewCategory) -> ServiceResult<CategoryDto> {
        new.validate()?;
        let category = self.db.categories().insert(&new).await?;
        info!(id = category.id, name = %category.name, "Category created");
        Ok(CategoryDto::from_parts(category, Vec::new()))
    }

    pub async fn update_category(
        &self,
        id: i64,
        patch: CategoryPatch,
    ) -> ServiceResult<CategoryDto> {
        patch.validate()?;
        let repo = self.db.categories();
        let mut category = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))?;

        patch.apply_to(&mut category);
        repo.update(&category).await?;

        let products = repo.products_for_category(id).await?;
        Ok(CategoryDto::from_parts(category, products))
    }

    /// Fails with Conflict while any product is linked.
    pub async fn delete_category(&self, id: i64) -> ServiceResult<()> {
        self.db.categories().delete(id).await?;
        info!(id = id, "Category deleted");
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn list_products(&self) -> ServiceResult<Vec<ProductDto>> {
        let products = self.db.products().list().await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    pub async fn get_product(&self, id: &str) -> ServiceResult<ProductDto> {
        validate_uuid("id", id)?;
        self.db
            .products()
            .get_by_id(id)
            .await?
            .map(ProductDto::from)
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    pub async fn create_product(&self, new: NewProduct) -> ServiceResult<ProductDto> {
        new.validate()?;
        let product = new.into_product(generate_id(), now());
        let product = self.db.products().insert(&product).await?;
        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product.into())
    }

    /// Find-then-merge update. A missing id fails before anything is written.
    pub async fn update_product(&self, id: &str, patch: ProductPatch) -> ServiceResult<ProductDto> {
        validate_uuid("id", id)?;
        patch.validate()?;

        let repo = self.db.products();
        let mut product = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))?;

        patch.apply_to(&mut product);
        product.updated_at = now();
        repo.update(&product).await?;

        debug!(id = %id, "Product updated");
        Ok(product.into())
    }

    pub async fn delete_product(&self, id: &str) -> ServiceResult<()> {
        validate_uuid("id", id)?;
        self.db.products().delete(id).await?;
        info!(id = %id, "Product deleted");
        Ok(())
    }

    // =========================================================================
    // Product Queries
    // =========================================================================

    /// Products priced within `[min, max]` cents, inclusive.
    pub async fn products_by_price_range(
        &self,
        min: i64,
        max: i64,
    ) -> ServiceResult<Vec<ProductDto>> {
        validate_price_range(min, max)?;
        let products = self.db.products().find_by_price_range(min, max).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    pub async fn products_sorted_by_price(
        &self,
        order: SortOrder,
    ) -> ServiceResult<Vec<ProductDto>> {
        let products = self.db.products().list_by_price(order).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    /// Products created strictly after `after`.
    pub async fn products_created_after(
        &self,
        after: DateTime<Utc>,
    ) -> ServiceResult<Vec<ProductDto>> {
        let products = self.db.products().find_created_after(after).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    pub async fn products_by_category_id(
        &self,
        category_id: i64,
    ) -> ServiceResult<Vec<ProductDto>> {
        let products = self.db.categories().products_for_category(category_id).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    pub async fn products_by_category_name(&self, name: &str) -> ServiceResult<Vec<ProductDto>> {
        let products = self.db.categories().products_for_category_name(name).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    pub async fn categories_for_product(
        &self,
        product_id: &str,
    ) -> ServiceResult<Vec<CategorySummaryDto>> {
        validate_uuid("product_id", product_id)?;
        let categories = self.db.categories().categories_for_product(product_id).await?;
        Ok(categories.into_iter().map(CategorySummaryDto::from).collect())
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// Links a product to a category. Linking twice is a no-op.
    pub async fn link_product_category(
        &self,
        product_id: &str,
        category_id: i64,
    ) -> ServiceResult<()> {
        self.require_link_ends(product_id, category_id).await?;

        let created = self
            .db
            .categories()
            .link_product(product_id, category_id)
            .await?;
        if created {
            info!(
                product_id = %product_id,
                category_id = category_id,
                "Product linked to category"
            );
        } else {
            debug!(product_id = %product_id, category_id = category_id, "Link already present");
        }
        Ok(())
    }

    pub async fn unlink_product_category(
        &self,
        product_id: &str,
        category_id: i64,
    ) -> ServiceResult<()> {
        validate_uuid("product_id", product_id)?;
        self.db
            .categories()
            .unlink_product(product_id, category_id)
            .await?;
        info!(
            product_id = %product_id,
            category_id = category_id,
            "Product unlinked from category"
        );
        Ok(())
    }

    async fn require_link_ends(&self, product_id: &str, category_id: i64) -> ServiceResult<()> {
        validate_uuid("product_id", product_id)?;
        if !self.db.products().exists(product_id).await? {
            return Err(ServiceError::not_found("Product", product_id));
        }
        if self.db.categories().get_by_id(category_id).await?.is_none() {
            return Err(ServiceError::not_found("Category", category_id));
        }
        Ok(())
    }
}
