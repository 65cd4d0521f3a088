//! # Store Repository
//!
//! Physical stores and their location lookups.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use commerce_core::Store;

/// Repository for stores.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<Store>> {
        let stores =
            sqlx::query_as::<_, Store>("SELECT id, name, city_id FROM stores ORDER BY name, id")
                .fetch_all(&self.pool)
                .await?;

        Ok(stores)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>("SELECT id, name, city_id FROM stores WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(store)
    }

    pub async fn insert(&self, store: &Store) -> DbResult<Store> {
        debug!(id = %store.id, name = %store.name, "Inserting store");

        sqlx::query("INSERT INTO stores (id, name, city_id) VALUES (?1, ?2, ?3)")
            .bind(&store.id)
            .bind(&store.name)
            .bind(store.city_id)
            .execute(&self.pool)
            .await?;

        Ok(store.clone())
    }

    pub async fn update(&self, store: &Store) -> DbResult<()> {
        debug!(id = %store.id, "Updating store");

        let result = sqlx::query("UPDATE stores SET name = ?2, city_id = ?3 WHERE id = ?1")
            .bind(&store.id)
            .bind(&store.name)
            .bind(store.city_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", &store.id));
        }

        Ok(())
    }

    /// Deletes a store. Restricted while it has stock rows.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting store");

        let result = sqlx::query("DELETE FROM stores WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }

        Ok(())
    }

    /// Stores located in a city.
    pub async fn find_by_city_id(&self, city_id: i64) -> DbResult<Vec<Store>> {
        debug!(city_id = city_id, "Listing stores by city id");

        let stores = sqlx::query_as::<_, Store>(
            "SELECT id, name, city_id FROM stores WHERE city_id = ?1 ORDER BY name, id",
        )
        .bind(city_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    /// Stores in any city with the given name.
    pub async fn find_by_city_name(&self, city_name: &str) -> DbResult<Vec<Store>> {
        debug!(city_name = %city_name, "Listing stores by city name");

        let stores = sqlx::query_as::<_, Store>(
            r#"
            SELECT s.id, s.name, s.city_id
            FROM stores s
            JOIN cities c ON c.id = s.city_id
            WHERE c.name = ?1
            ORDER BY s.name, s.id
            "#,
        )
        .bind(city_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }
}
