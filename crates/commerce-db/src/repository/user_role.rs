//! # User Role Repository

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use commerce_core::payload::NewUserRole;
use commerce_core::UserRole;

/// Repository for user roles.
#[derive(Debug, Clone)]
pub struct UserRoleRepository {
    pool: SqlitePool,
}

impl UserRoleRepository {
    /// Creates a new UserRoleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRoleRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<UserRole>> {
        let roles = sqlx::query_as::<_, UserRole>("SELECT id, role FROM user_roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<UserRole>> {
        let role = sqlx::query_as::<_, UserRole>("SELECT id, role FROM user_roles WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    pub async fn insert(&self, role: &NewUserRole) -> DbResult<UserRole> {
        debug!(role = %role.role, "Inserting user role");

        let result = sqlx::query("INSERT INTO user_roles (role) VALUES (?1)")
            .bind(role.role)
            .execute(&self.pool)
            .await?;

        Ok(UserRole {
            id: result.last_insert_rowid(),
            role: role.role,
        })
    }

    pub async fn update(&self, role: &UserRole) -> DbResult<()> {
        debug!(id = role.id, role = %role.role, "Updating user role");

        let result = sqlx::query("UPDATE user_roles SET role = ?2 WHERE id = ?1")
            .bind(role.id)
            .bind(role.role)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("UserRole", role.id));
        }

        Ok(())
    }

    /// Deletes a role. Restricted while users hold it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting user role");

        let result = sqlx::query("DELETE FROM user_roles WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("UserRole", id));
        }

        Ok(())
    }
}
