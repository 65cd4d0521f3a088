//! # City Repository
//!
//! Cities belong to a department and locate stores and users.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use commerce_core::payload::NewCity;
use commerce_core::City;

/// Repository for cities.
#[derive(Debug, Clone)]
pub struct CityRepository {
    pool: SqlitePool,
}

impl CityRepository {
    /// Creates a new CityRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CityRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<City>> {
        let cities = sqlx::query_as::<_, City>(
            "SELECT id, name, department_id FROM cities ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(cities)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<City>> {
        let city =
            sqlx::query_as::<_, City>("SELECT id, name, department_id FROM cities WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(city)
    }

    /// Cities of one department, ordered by name.
    pub async fn find_by_department(&self, department_id: i64) -> DbResult<Vec<City>> {
        let cities = sqlx::query_as::<_, City>(
            "SELECT id, name, department_id FROM cities WHERE department_id = ?1 ORDER BY name, id",
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cities)
    }

    pub async fn insert(&self, city: &NewCity) -> DbResult<City> {
        let name = city.name.trim();
        debug!(name = %name, department_id = city.department_id, "Inserting city");

        let result = sqlx::query("INSERT INTO cities (name, department_id) VALUES (?1, ?2)")
            .bind(name)
            .bind(city.department_id)
            .execute(&self.pool)
            .await?;

        Ok(City {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            department_id: city.department_id,
        })
    }

    pub async fn update(&self, city: &City) -> DbResult<()> {
        debug!(id = city.id, "Updating city");

        let result = sqlx::query("UPDATE cities SET name = ?2, department_id = ?3 WHERE id = ?1")
            .bind(city.id)
            .bind(&city.name)
            .bind(city.department_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("City", city.id));
        }

        Ok(())
    }

    /// Deletes a city. Restricted while stores or users are located in it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting city");

        let result = sqlx::query("DELETE FROM cities WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("City", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;

    #[tokio::test]
    async fn test_find_by_department() {
        let db = fixtures::db().await;
        let medellin = fixtures::city(&db, "Medellín").await;
        let city = db.cities().get_by_id(medellin).await.unwrap().unwrap();
        db.cities()
            .insert(&NewCity {
                name: "Envigado".to_string(),
                department_id: city.department_id,
            })
            .await
            .unwrap();
        fixtures::city(&db, "Cali").await;

        let names: Vec<String> = db
            .cities()
            .find_by_department(city.department_id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Envigado", "Medellín"]);
    }

    #[tokio::test]
    async fn test_delete_with_store_is_restricted() {
        let db = fixtures::db().await;
        let city = fixtures::city(&db, "Bogotá").await;
        fixtures::store(&db, "Chapinero", city).await;

        let err = db.cities().delete(city).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_insert_with_unknown_department_fails() {
        let db = fixtures::db().await;
        let err = db
            .cities()
            .insert(&NewCity {
                name: "Nowhere".to_string(),
                department_id: 999,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
