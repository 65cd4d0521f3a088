//! # Inventory Service
//!
//! Stores and the `store_products` rows that record where each product is
//! stocked.
//!
//! A store may hold several rows for the same product (separate locations
//! or restocking events). [`InventoryService::stock_levels_for_store`] sums
//! them; the raw rows stay available through
//! [`InventoryService::store_products_for_store`].

use tracing::info;

use commerce_core::dto::{ProductDto, StockLevelDto, StoreDto, StoreProductDto};
use commerce_core::payload::{NewStore, NewStoreProduct, StorePatch, StoreProductPatch};
use commerce_core::validation::validate_uuid;
use commerce_db::{generate_id, Database};

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct InventoryService {
    db: Database,
}

impl InventoryService {
    pub fn new(db: Database) -> Self {
        InventoryService { db }
    }

    // =========================================================================
    // Stores
    // =========================================================================

    pub async fn list_stores(&self) -> ServiceResult<Vec<StoreDto>> {
        let stores = self.db.stores().list().await?;
        Ok(stores.into_iter().map(StoreDto::from).collect())
    }

    pub async fn get_store(&self, id: &str) -> ServiceResult<StoreDto> {
        validate_uuid("id", id)?;
        self.db
            .stores()
            .get_by_id(id)
            .await?
            .map(StoreDto::from)
            .ok_or_else(|| ServiceError::not_found("Store", id))
    }

    pub async fn create_store(&self, new: NewStore) -> ServiceResult<StoreDto> {
        new.validate()?;
        self.require_city(new.city_id).await?;

        let store = new.into_store(generate_id());
        let store = self.db.stores().insert(&store).await?;
        info!(id = %store.id, name = %store.name, "Store created");
        Ok(store.into())
    }

    pub async fn update_store(&self, id: &str, patch: StorePatch) -> ServiceResult<StoreDto> {
        validate_uuid("id", id)?;
        patch.validate()?;

        let repo = self.db.stores();
        let mut store = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Store", id))?;

        if let Some(city_id) = patch.city_id {
            self.require_city(city_id).await?;
        }

        patch.apply_to(&mut store);
        repo.update(&store).await?;
        Ok(store.into())
    }

    /// Fails with Conflict while the store still has stock rows.
    pub async fn delete_store(&self, id: &str) -> ServiceResult<()> {
        validate_uuid("id", id)?;
        self.db.stores().delete(id).await?;
        info!(id = %id, "Store deleted");
        Ok(())
    }

    pub async fn stores_by_city_id(&self, city_id: i64) -> ServiceResult<Vec<StoreDto>> {
        let stores = self.db.stores().find_by_city_id(city_id).await?;
        Ok(stores.into_iter().map(StoreDto::from).collect())
    }

    pub async fn stores_by_city_name(&self, city_name: &str) -> ServiceResult<Vec<StoreDto>> {
        let stores = self.db.stores().find_by_city_name(city_name).await?;
        Ok(stores.into_iter().map(StoreDto::from).collect())
    }

    // =========================================================================
    // Products by Store
    // =========================================================================

    /// Distinct products stocked by the store.
    pub async fn products_by_store_id(&self, store_id: &str) -> ServiceResult<Vec<ProductDto>> {
        validate_uuid("store_id", store_id)?;
        let products = self.db.products().find_by_store_id(store_id).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    pub async fn products_by_store_name(&self, store_name: &str) -> ServiceResult<Vec<ProductDto>> {
        let products = self.db.products().find_by_store_name(store_name).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    // =========================================================================
    // Store Products
    // =========================================================================

    pub async fn list_store_products(&self) -> ServiceResult<Vec<StoreProductDto>> {
        let rows = self.db.store_products().list().await?;
        Ok(rows.into_iter().map(StoreProductDto::from).collect())
    }

    pub async fn get_store_product(&self, id: i64) -> ServiceResult<StoreProductDto> {
        self.db
            .store_products()
            .get_by_id(id)
            .await?
            .map(StoreProductDto::from)
            .ok_or_else(|| ServiceError::not_found("StoreProduct", id))
    }

    pub async fn create_store_product(
        &self,
        new: NewStoreProduct,
    ) -> ServiceResult<StoreProductDto> {
        new.validate()?;
        self.require_store(&new.store_id).await?;
        self.require_product(&new.product_id).await?;

        let row = self.db.store_products().insert(&new).await?;
        info!(
            id = row.id,
            store_id = %row.store_id,
            product_id = %row.product_id,
            stock = row.stock,
            "Stock row created"
        );
        Ok(row.into())
    }

    pub async fn update_store_product(
        &self,
        id: i64,
        patch: StoreProductPatch,
    ) -> ServiceResult<StoreProductDto> {
        patch.validate()?;

        let repo = self.db.store_products();
        let mut row = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("StoreProduct", id))?;

        if let Some(store_id) = &patch.store_id {
            self.require_store(store_id).await?;
        }
        if let Some(product_id) = &patch.product_id {
            self.require_product(product_id).await?;
        }

        patch.apply_to(&mut row);
        repo.update(&row).await?;
        Ok(row.into())
    }

    pub async fn delete_store_product(&self, id: i64) -> ServiceResult<()> {
        self.db.store_products().delete(id).await?;
        info!(id = id, "Stock row deleted");
        Ok(())
    }

    /// Raw stock rows of the store, duplicates included.
    pub async fn store_products_for_store(
        &self,
        store_id: &str,
    ) -> ServiceResult<Vec<StoreProductDto>> {
        validate_uuid("store_id", store_id)?;
        let rows = self.db.store_products().find_by_store(store_id).await?;
        Ok(rows.into_iter().map(StoreProductDto::from).collect())
    }

    /// Stock per product, summed over duplicate rows, ordered by product name.
    /// Empty for a store with no rows, including one that does not exist.
    pub async fn stock_levels_for_store(
        &self,
        store_id: &str,
    ) -> ServiceResult<Vec<StockLevelDto>> {
        validate_uuid("store_id", store_id)?;
        let levels = self.db.store_products().stock_levels_for_store(store_id).await?;
        Ok(levels.into_iter().map(StockLevelDto::from).collect())
    }

    // =========================================================================
    // Parent resolution
    // =========================================================================

    async fn require_city(&self, id: i64) -> ServiceResult<()> {
        match self.db.cities().get_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("City", id)),
        }
    }

    async fn require_store(&self, id: &str) -> ServiceResult<()> {
        match self.db.stores().get_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("Store", id)),
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
