//! # Category Repository
//!
//! Categories and the `product_categories` junction.
//!
//! Both directions of the many-to-many relationship are read here, each as
//! a flat list: products of a category, and categories of a product. No
//! query ever returns a nested graph.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use commerce_core::payload::NewCategory;
use commerce_core::{Category, Product};

/// One row of the category/product left join. Product columns are NULL for
/// a category with no links.
#[derive(sqlx::FromRow)]
struct CategoryProductRow {
    category_id: i64,
    category_name: String,
    product_id: Option<String>,
    product_name: Option<String>,
    description: Option<String>,
    price_cents: Option<i64>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl CategoryProductRow {
    fn product(self) -> Option<Product> {
        Some(Product {
            id: self.product_id?,
            name: self.product_name?,
            description: self.description?,
            price_cents: self.price_cents?,
            created_at: self.created_at?,
            updated_at: self.updated_at?,
        })
    }
}

/// Folds rows ordered by category into one entry per category.
fn group_by_category(rows: Vec<CategoryProductRow>) -> Vec<(Category, Vec<Product>)> {
    let mut grouped: Vec<(Category, Vec<Product>)> = Vec::new();
    for row in rows {
        let is_new = grouped
            .last()
            .map_or(true, |(category, _)| category.id != row.category_id);
        if is_new {
            grouped.push((
                Category {
                    id: row.category_id,
                    name: row.category_name.clone(),
                },
                Vec::new(),
            ));
        }
        if let (Some(product), Some((_, products))) = (row.product(), grouped.last_mut()) {
            products.push(product);
        }
    }
    grouped
}

/// Repository for categories and product links.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(category)
    }

    /// Every category with its linked products, in one statement.
    ///
    /// `name` narrows to the category with that exact, case-sensitive name;
    /// names are unique, so that is at most one entry.
    pub async fn list_with_products(
        &self,
        name: Option<&str>,
    ) -> DbResult<Vec<(Category, Vec<Product>)>> {
        debug!(name = ?name, "Listing categories with products");

        let rows = sqlx::query_as::<_, CategoryProductRow>(
            r#"
            SELECT c.id AS category_id, c.name AS category_name,
                   p.id AS product_id, p.name AS product_name, p.description,
                   p.price_cents, p.created_at, p.updated_at
            FROM categories c
            LEFT JOIN product_categories pc ON pc.category_id = c.id
            LEFT JOIN products p ON p.id = pc.product_id
            WHERE ?1 IS NULL OR c.name = ?1
            ORDER BY c.name, c.id, p.name, p.id
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_by_category(rows))
    }

    /// Inserts a category.
    ///
    /// ## Returns
    /// * `Ok(Category)` - Row with its generated id
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    pub async fn insert(&self, category: &NewCategory) -> DbResult<Category> {
        let name = category.name.trim();
        debug!(name = %name, "Inserting category");

        let result = sqlx::query("INSERT INTO categories (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub async fn update(&self, category: &Category) -> DbResult<()> {
        debug!(id = category.id, "Updating category");

        let result = sqlx::query("UPDATE categories SET name = ?2 WHERE id = ?1")
            .bind(category.id)
            .bind(&category.name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", category.id));
        }

        Ok(())
    }

    /// Deletes a category. Restricted while any product is linked.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    // =========================================================================
    // Product links
    // =========================================================================

    /// Links a product to a category.
    ///
    /// Returns `false` when the pair was already linked; nothing is written
    /// in that case.
    pub async fn link_product(&self, product_id: &str, category_id: i64) -> DbResult<bool> {
        debug!(
            product_id = %product_id,
            category_id = category_id,
            "Linking product to category"
        );

        let result = sqlx::query(
            "INSERT OR IGNORE INTO product_categories (product_id, category_id) VALUES (?1, ?2)",
        )
        .bind(product_id)
        .bind(category_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Removes a product-category link.
    pub async fn unlink_product(&self, product_id: &str, category_id: i64) -> DbResult<()> {
        debug!(
            product_id = %product_id,
            category_id = category_id,
            "Unlinking product from category"
        );

        let result = sqlx::query(
            "DELETE FROM product_categories WHERE product_id = ?1 AND category_id = ?2",
        )
        .bind(product_id)
        .bind(category_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "ProductCategory",
                format!("{product_id}/{category_id}"),
            ));
        }

        Ok(())
    }

    /// Distinct products linked to the category, ordered by name.
    pub async fn products_for_category(&self, category_id: i64) -> DbResult<Vec<Product>> {
        debug!(category_id = category_id, "Listing products by category id");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price_cents, p.created_at, p.updated_at
            FROM products p
            WHERE EXISTS (
                SELECT 1 FROM product_categories pc
                WHERE pc.product_id = p.id AND pc.category_id = ?1
            )
            ORDER BY p.name, p.id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Distinct products linked to the category with the given name.
    pub async fn products_for_category_name(&self, name: &str) -> DbResult<Vec<Product>> {
        debug!(category = %name, "Listing products by category name");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price_cents, p.created_at, p.updated_at
            FROM products p
            WHERE EXISTS (
                SELECT 1 FROM product_categories pc
                JOIN categories c ON c.id = pc.category_id
                WHERE pc.product_id = p.id AND c.name = ?1
            )
            ORDER BY p.name, p.id
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Categories the product is linked to, ordered by name.
    pub async fn categories_for_product(&self, product_id: &str) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name
            FROM categories c
            JOIN product_categories pc ON pc.category_id = c.id
            WHERE pc.product_id = ?1
            ORDER BY c.name
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;

    fn named(name: &str) -> NewCategory {
        NewCategory {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_name_is_unique_violation() {
        let db = fixtures::db().await;
        db.categories().insert(&named("Drinks")).await.unwrap();

        let err = db.categories().insert(&named("Drinks")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_link_is_idempotent_and_both_directions_resolve() {
        let db = fixtures::db().await;
        let drinks = db.categories().insert(&named("Drinks")).await.unwrap();
        let hot = db.categories().insert(&named("Hot")).await.unwrap();
        let coffee = fixtures::product(&db, "Coffee", 1200).await;
        let juice = fixtures::product(&db, "Juice", 500).await;

        let repo = db.categories();
        assert!(repo.link_product(&coffee.id, drinks.id).await.unwrap());
        assert!(!repo.link_product(&coffee.id, drinks.id).await.unwrap());
        repo.link_product(&juice.id, drinks.id).await.unwrap();
        repo.link_product(&coffee.id, hot.id).await.unwrap();

        let products = repo.products_for_category(drinks.id).await.unwrap();
        assert_eq!(products, vec![coffee.clone(), juice.clone()]);

        let by_name = repo.products_for_category_name("Hot").await.unwrap();
        assert_eq!(by_name, vec![coffee.clone()]);

        let categories = repo.categories_for_product(&coffee.id).await.unwrap();
        assert_eq!(categories, vec![drinks, hot]);
    }

    #[tokio::test]
    async fn test_list_with_products_groups_every_category() {
        let db = fixtures::db().await;
        let repo = db.categories();
        let drinks = repo.insert(&named("Drinks")).await.unwrap();
        let empty = repo.insert(&named("Empty")).await.unwrap();
        let hot = repo.insert(&named("Hot")).await.unwrap();
        let coffee = fixtures::product(&db, "Coffee", 1200).await;
        let juice = fixtures::product(&db, "Juice", 500).await;
        repo.link_product(&juice.id, drinks.id).await.unwrap();
        repo.link_product(&coffee.id, drinks.id).await.unwrap();
        repo.link_product(&coffee.id, hot.id).await.unwrap();

        let all = repo.list_with_products(None).await.unwrap();
        assert_eq!(
            all,
            vec![
                (drinks.clone(), vec![coffee.clone(), juice.clone()]),
                (empty, vec![]),
                (hot, vec![coffee.clone()]),
            ]
        );

        let one = repo.list_with_products(Some("Drinks")).await.unwrap();
        assert_eq!(one, vec![(drinks, vec![coffee, juice])]);
        assert!(repo.list_with_products(Some("drinks")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_linked_category_is_restricted() {
        let db = fixtures::db().await;
        let drinks = db.categories().insert(&named("Drinks")).await.unwrap();
        let coffee = fixtures::product(&db, "Coffee", 1200).await;
        db.categories().link_product(&coffee.id, drinks.id).await.unwrap();

        let err = db.categories().delete(drinks.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        db.categories().unlink_product(&coffee.id, drinks.id).await.unwrap();
        db.categories().delete(drinks.id).await.unwrap();
        assert!(db.categories().get_by_id(drinks.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unlink_unknown_pair_is_not_found() {
        let db = fixtures::db().await;
        let drinks = db.categories().insert(&named("Drinks")).await.unwrap();
        let coffee = fixtures::product(&db, "Coffee", 1200).await;

        let err = db
            .categories()
            .unlink_product(&coffee.id, drinks.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
