//! # User Repository
//!
//! Users and their searches.
//!
//! ## Case Handling
//! Every write also stores `first_name_folded` and `last_name_folded`, the
//! names lowercased in Rust. Searches fold their argument the same way and
//! compare against those columns, so "GÓMEZ" finds "Gómez". SQLite's own
//! NOCASE and LIKE folding is ASCII-only and is not relied on.
//!
//! ## Search Joins
//! ```text
//! by city id          users.city_id = ?
//! by city name        users ⋈ cities               WHERE cities.name = ?
//! by department name  users ⋈ cities ⋈ departments WHERE departments.name = ?
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use commerce_core::{NamePattern, User};

/// Unicode lowercase used for the `*_folded` columns and search arguments.
fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Repository for users.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, email, password_hash,
                   phone, created_at, role_id, city_id
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, email, password_hash,
                   phone, created_at, role_id, city_id
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts a user.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Username or email already taken
    pub async fn insert(&self, user: &User) -> DbResult<User> {
        debug!(id = %user.id, username = %user.username, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (
                id, first_name, last_name, username, email, password_hash,
                phone, created_at, role_id, city_id,
                first_name_folded, last_name_folded
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.created_at)
        .bind(user.role_id)
        .bind(user.city_id)
        .bind(fold(&user.first_name))
        .bind(fold(&user.last_name))
        .execute(&self.pool)
        .await?;

        Ok(user.clone())
    }

    /// Updates a user. `created_at` is never written.
    pub async fn update(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, "Updating user");

        let result = sqlx::query(
            r#"
            UPDATE users SET
                first_name = ?2,
                last_name = ?3,
                username = ?4,
                email = ?5,
                password_hash = ?6,
                phone = ?7,
                role_id = ?8,
                city_id = ?9,
                first_name_folded = ?10,
                last_name_folded = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.role_id)
        .bind(user.city_id)
        .bind(fold(&user.first_name))
        .bind(fold(&user.last_name))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", &user.id));
        }

        Ok(())
    }

    /// Deletes a user. Restricted while the user has sales.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Case-insensitive exact match on last name.
    pub async fn find_by_last_name(&self, last_name: &str) -> DbResult<Vec<User>> {
        debug!(last_name = %last_name, "Searching users by last name");

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, email, password_hash,
                   phone, created_at, role_id, city_id
            FROM users
            WHERE last_name_folded = ?1
            ORDER BY username
            "#,
        )
        .bind(fold(last_name))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn find_by_city_id(&self, city_id: i64) -> DbResult<Vec<User>> {
        debug!(city_id = city_id, "Searching users by city id");

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, email, password_hash,
                   phone, created_at, role_id, city_id
            FROM users
            WHERE city_id = ?1
            ORDER BY username
            "#,
        )
        .bind(city_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn find_by_city_name(&self, city_name: &str) -> DbResult<Vec<User>> {
        debug!(city_name = %city_name, "Searching users by city name");

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.first_name, u.last_name, u.username, u.email, u.password_hash,
                   u.phone, u.created_at, u.role_id, u.city_id
            FROM users u
            JOIN cities c ON c.id = u.city_id
            WHERE c.name = ?1
            ORDER BY u.username
            "#,
        )
        .bind(city_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn find_by_department_name(&self, department_name: &str) -> DbResult<Vec<User>> {
        debug!(department_name = %department_name, "Searching users by department name");

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.first_name, u.last_name, u.username, u.email, u.password_hash,
                   u.phone, u.created_at, u.role_id, u.city_id
            FROM users u
            JOIN cities c ON c.id = u.city_id
            JOIN departments d ON d.id = c.department_id
            WHERE d.name = ?1
            ORDER BY u.username
            "#,
        )
        .bind(department_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Case-insensitive first-name pattern search.
    pub async fn find_by_first_name(&self, pattern: &NamePattern) -> DbResult<Vec<User>> {
        let like = fold(&pattern.to_like_pattern());
        debug!(pattern = %like, "Searching users by first name");

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, email, password_hash,
                   phone, created_at, role_id, city_id
            FROM users
            WHERE first_name_folded LIKE ?1 ESCAPE '\'
            ORDER BY username
            "#,
        )
        .bind(like)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
