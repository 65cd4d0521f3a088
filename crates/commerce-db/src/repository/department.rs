//! # Department Repository
//!
//! Top level of the geography hierarchy.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use commerce_core::payload::NewDepartment;
use commerce_core::Department;

/// Repository for departments.
#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    pool: SqlitePool,
}

impl DepartmentRepository {
    /// Creates a new DepartmentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DepartmentRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<Department>> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name, id")
                .fetch_all(&self.pool)
                .await?;

        Ok(departments)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Department>> {
        let department =
            sqlx::query_as::<_, Department>("SELECT id, name FROM departments WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(department)
    }

    pub async fn insert(&self, department: &NewDepartment) -> DbResult<Department> {
        let name = department.name.trim();
        debug!(name = %name, "Inserting department");

        let result = sqlx::query("INSERT INTO departments (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(Department {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub async fn update(&self, department: &Department) -> DbResult<()> {
        debug!(id = department.id, "Updating department");

        let result = sqlx::query("UPDATE departments SET name = ?2 WHERE id = ?1")
            .bind(department.id)
            .bind(&department.name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Department", department.id));
        }

        Ok(())
    }

    /// Deletes a department. Restricted while any city belongs to it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting department");

        let result = sqlx::query("DELETE FROM departments WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Department", id));
        }

        Ok(())
    }
}
