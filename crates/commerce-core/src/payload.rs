//! # Inbound Payloads
//!
//! `New*` payloads carry every field needed to create a row; `*Patch`
//! payloads carry only the fields a caller wants to change.
//!
//! ## Find-Then-Merge
//! ```text
//! update(id, patch)
//!      │
//!      ├── patch.validate()          (present fields only)
//!      ├── repo.get_by_id(id)        → NotFound if absent
//!      ├── patch.apply_to(&mut row)  ← THIS MODULE
//!      ├── service stamps updated_at (products)
//!      └── repo.update(&row)
//! ```
//!
//! Parent references are plain ids; the service resolves them before
//! writing. Identifiers and timestamps are never accepted from callers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{
    Category, City, Department, Product, Role, Sale, SaleProduct, Store, StoreProduct, User,
    UserRole,
};
use crate::validation::{
    validate_email, validate_name, validate_non_negative, validate_phone, validate_quantity,
    validate_required, validate_uuid, ValidationResult,
};
use crate::{MAX_NAME_LEN, MAX_PERSON_NAME_LEN, MAX_PRODUCT_NAME_LEN};

/// Trims a caller-supplied string before it is stored.
fn clean(value: &str) -> String {
    value.trim().to_string()
}

// =============================================================================
// Geography
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewDepartment {
    pub name: String,
}

impl NewDepartment {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name, MAX_NAME_LEN)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DepartmentPatch {
    pub name: Option<String>,
}

impl DepartmentPatch {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name, MAX_NAME_LEN)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, department: &mut Department) {
        if let Some(name) = &self.name {
            department.name = clean(name);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCity {
    pub name: String,
    pub department_id: i64,
}

impl NewCity {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name, MAX_NAME_LEN)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CityPatch {
    pub name: Option<String>,
    pub department_id: Option<i64>,
}

impl CityPatch {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name, MAX_NAME_LEN)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, city: &mut City) {
        if let Some(name) = &self.name {
            city.name = clean(name);
        }
        if let Some(department_id) = self.department_id {
            city.department_id = department_id;
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name, MAX_NAME_LEN)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryPatch {
    pub name: Option<String>,
}

impl CategoryPatch {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name, MAX_NAME_LEN)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = clean(name);
        }
    }
}

/// Create payload for a product. `price` is in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: i64,
}

impl NewProduct {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name, MAX_PRODUCT_NAME_LEN)?;
        validate_required("description", &self.description)?;
        validate_non_negative("price", self.price)
    }

    /// Builds the row to insert. Both timestamps start at `now`.
    pub fn into_product(self, id: String, now: chrono::DateTime<chrono::Utc>) -> Product {
        Product {
            id,
            name: clean(&self.name),
            description: clean(&self.description),
            price_cents: self.price,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
}

impl ProductPatch {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name, MAX_PRODUCT_NAME_LEN)?;
        }
        if let Some(description) = &self.description {
            validate_required("description", description)?;
        }
        if let Some(price) = self.price {
            validate_non_negative("price", price)?;
        }
        Ok(())
    }

    /// Overlays the supplied fields. `created_at` and `updated_at` are
    /// left alone; the caller stamps `updated_at`.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = clean(name);
        }
        if let Some(description) = &self.description {
            product.description = clean(description);
        }
        if let Some(price) = self.price {
            product.price_cents = price;
        }
    }
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewStore {
    pub name: String,
    pub city_id: i64,
}

impl NewStore {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name, MAX_NAME_LEN)
    }

    pub fn into_store(self, id: String) -> Store {
        Store {
            id,
            name: clean(&self.name),
            city_id: self.city_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StorePatch {
    pub name: Option<String>,
    pub city_id: Option<i64>,
}

impl StorePatch {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name, MAX_NAME_LEN)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, store: &mut Store) {
        if let Some(name) = &self.name {
            store.name = clean(name);
        }
        if let Some(city_id) = self.city_id {
            store.city_id = city_id;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewStoreProduct {
    pub stock: i64,
    pub address: String,
    pub store_id: String,
    pub product_id: String,
}

impl NewStoreProduct {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_non_negative("stock", self.stock)?;
        validate_required("address", &self.address)?;
        validate_uuid("store_id", &self.store_id)?;
        validate_uuid("product_id", &self.product_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoreProductPatch {
    pub stock: Option<i64>,
    pub address: Option<String>,
    pub store_id: Option<String>,
    pub product_id: Option<String>,
}

impl StoreProductPatch {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(stock) = self.stock {
            validate_non_negative("stock", stock)?;
        }
        if let Some(address) = &self.address {
            validate_required("address", address)?;
        }
        if let Some(store_id) = &self.store_id {
            validate_uuid("store_id", store_id)?;
        }
        if let Some(product_id) = &self.product_id {
            validate_uuid("product_id", product_id)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, row: &mut StoreProduct) {
        if let Some(stock) = self.stock {
            row.stock = stock;
        }
        if let Some(address) = &self.address {
            row.address = clean(address);
        }
        if let Some(store_id) = &self.store_id {
            row.store_id = store_id.clone();
        }
        if let Some(product_id) = &self.product_id {
            row.product_id = product_id.clone();
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewUserRole {
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserRolePatch {
    pub role: Option<Role>,
}

impl UserRolePatch {
    pub fn apply_to(&self, row: &mut UserRole) {
        if let Some(role) = self.role {
            row.role = role;
        }
    }
}

/// Create payload for a user. `password` is plain text and is hashed by the
/// identity service before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role_id: i64,
    pub city_id: i64,
}

impl NewUser {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("first_name", &self.first_name, MAX_PERSON_NAME_LEN)?;
        validate_name("last_name", &self.last_name, MAX_PERSON_NAME_LEN)?;
        validate_name("username", &self.username, MAX_NAME_LEN)?;
        validate_email(&self.email)?;
        validate_required("password", &self.password)?;
        validate_phone(&self.phone)
    }

    /// Builds the row to insert from an already-computed password hash.
    pub fn into_user(
        self,
        id: String,
        password_hash: String,
        now: chrono::DateTime<chrono::Utc>,
    ) -> User {
        User {
            id,
            first_name: clean(&self.first_name),
            last_name: clean(&self.last_name),
            username: clean(&self.username),
            email: clean(&self.email),
            password_hash,
            phone: clean(&self.phone),
            created_at: now,
            role_id: self.role_id,
            city_id: self.city_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub role_id: Option<i64>,
    pub city_id: Option<i64>,
}

impl UserPatch {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(v) = &self.first_name {
            validate_name("first_name", v, MAX_PERSON_NAME_LEN)?;
        }
        if let Some(v) = &self.last_name {
            validate_name("last_name", v, MAX_PERSON_NAME_LEN)?;
        }
        if let Some(v) = &self.username {
            validate_name("username", v, MAX_NAME_LEN)?;
        }
        if let Some(v) = &self.email {
            validate_email(v)?;
        }
        if let Some(v) = &self.password {
            validate_required("password", v)?;
        }
        if let Some(v) = &self.phone {
            validate_phone(v)?;
        }
        Ok(())
    }

    /// Overlays every field except `password`, which needs hashing and is
    /// handled by the identity service.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(v) = &self.first_name {
            user.first_name = clean(v);
        }
        if let Some(v) = &self.last_name {
            user.last_name = clean(v);
        }
        if let Some(v) = &self.username {
            user.username = clean(v);
        }
        if let Some(v) = &self.email {
            user.email = clean(v);
        }
        if let Some(v) = &self.phone {
            user.phone = clean(v);
        }
        if let Some(role_id) = self.role_id {
            user.role_id = role_id;
        }
        if let Some(city_id) = self.city_id {
            user.city_id = city_id;
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewSale {
    pub total_amount: i64,
    pub user_id: String,
}

impl NewSale {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_non_negative("total_amount", self.total_amount)?;
        validate_uuid("user_id", &self.user_id)
    }

    /// Builds the row to insert. `sale_date` is fixed here for good.
    pub fn into_sale(self, id: String, sale_date: chrono::DateTime<chrono::Utc>) -> Sale {
        Sale {
            id,
            sale_date,
            total_amount: self.total_amount,
            user_id: self.user_id,
        }
    }
}

/// Update payload for a sale. `sale_date` is immutable and has no field here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalePatch {
    pub total_amount: Option<i64>,
    pub user_id: Option<String>,
}

impl SalePatch {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(total) = self.total_amount {
            validate_non_negative("total_amount", total)?;
        }
        if let Some(user_id) = &self.user_id {
            validate_uuid("user_id", user_id)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, sale: &mut Sale) {
        if let Some(total) = self.total_amount {
            sale.total_amount = total;
        }
        if let Some(user_id) = &self.user_id {
            sale.user_id = user_id.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewSaleProduct {
    pub quantity: i64,
    pub sale_id: String,
    pub product_id: String,
}

impl NewSaleProduct {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_quantity(self.quantity)?;
        validate_uuid("sale_id", &self.sale_id)?;
        validate_uuid("product_id", &self.product_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleProductPatch {
    pub quantity: Option<i64>,
    pub sale_id: Option<String>,
    pub product_id: Option<String>,
}

impl SaleProductPatch {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(sale_id) = &self.sale_id {
            validate_uuid("sale_id", sale_id)?;
        }
        if let Some(product_id) = &self.product_id {
            validate_uuid("product_id", product_id)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, line: &mut SaleProduct) {
        if let Some(quantity) = self.quantity {
            line.quantity = quantity;
        }
        if let Some(sale_id) = &self.sale_id {
            line.sale_id = sale_id.clone();
        }
        if let Some(product_id) = &self.product_id {
            line.product_id = product_id.clone();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use chrono::{DateTime, Utc};

    fn sample_product() -> Product {
        let created: DateTime<Utc> = "2026-01-01T00:00:00Z".parse().unwrap();
        Product {
            id: "p1".to_string(),
            name: "Coffee".to_string(),
            description: "Ground coffee 500g".to_string(),
            price_cents: 1200,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_product_patch_overlays_only_supplied_fields() {
        let mut product = sample_product();
        let patch = ProductPatch {
            price: Some(1500),
            ..Default::default()
        };

        patch.apply_to(&mut product);

        assert_eq!(product.price_cents, 1500);
        assert_eq!(product.name, "Coffee");
        assert_eq!(product.description, "Ground coffee 500g");
        assert_eq!(product.created_at, sample_product().created_at);
    }

    #[test]
    fn test_empty_patch_is_a_no_op() {
        let mut product = sample_product();
        ProductPatch::default().apply_to(&mut product);
        assert_eq!(product, sample_product());
    }

    #[test]
    fn test_new_product_rejects_negative_price() {
        let payload = NewProduct {
            name: "Tea".to_string(),
            description: "Green".to_string(),
            price: -1,
        };
        assert!(matches!(
            payload.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_new_product_trims_and_stamps() {
        let now: DateTime<Utc> = "2026-02-02T12:00:00Z".parse().unwrap();
        let product = NewProduct {
            name: "  Tea ".to_string(),
            description: "Green".to_string(),
            price: 300,
        }
        .into_product("p9".to_string(), now);

        assert_eq!(product.name, "Tea");
        assert_eq!(product.created_at, now);
        assert_eq!(product.updated_at, now);
    }

    #[test]
    fn test_new_user_validation() {
        let mut user = NewUser {
            first_name: "Ana".to_string(),
            last_name: "Gómez".to_string(),
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
            phone: "3001234567".to_string(),
            role_id: 1,
            city_id: 1,
        };
        assert!(user.validate().is_ok());

        user.first_name = "x".repeat(33);
        assert!(matches!(user.validate(), Err(ValidationError::TooLong { .. })));
    }

    #[test]
    fn test_user_patch_leaves_password_hash_alone() {
        let mut user = User {
            id: "u1".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Gómez".to_string(),
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "hash".to_string(),
            phone: "1".to_string(),
            created_at: Utc::now(),
            role_id: 1,
            city_id: 1,
        };
        let patch = UserPatch {
            password: Some("new-secret".to_string()),
            city_id: Some(4),
            ..Default::default()
        };

        patch.apply_to(&mut user);

        assert_eq!(user.password_hash, "hash");
        assert_eq!(user.city_id, 4);
    }

    #[test]
    fn test_sale_patch_has_no_sale_date() {
        let json = serde_json::json!({ "totalAmount": 900, "saleDate": "2020-01-01T00:00:00Z" });
        let patch: SalePatch = serde_json::from_value(json).unwrap();
        assert_eq!(patch.total_amount, Some(900));
        assert!(patch.user_id.is_none());
    }

    #[test]
    fn test_sale_line_quantity_must_be_positive() {
        let line = NewSaleProduct {
            quantity: 0,
            sale_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            product_id: "550e8400-e29b-41d4-a716-446655440001".to_string(),
        };
        assert!(matches!(
            line.validate(),
            Err(ValidationError::MustBePositive { .. })
        ));
    }
}
