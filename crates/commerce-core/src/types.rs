//! # Domain Types
//!
//! Persistence entities for Commerce Manager. Each struct maps 1:1 to a
//! table row; relationships are carried as foreign-key ids, never as nested
//! object graphs.
//!
//! ## Entity Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Entity Relationships                            │
//! │                                                                         │
//! │  Department 1──* City 1──* Store 1──* StoreProduct *──1 Product         │
//! │                    │                                     │  │           │
//! │                    1                                     │  *           │
//! │                    │                                     │  product_    │
//! │  UserRole 1──*   User 1──* Sale 1──* SaleProduct *──1────┘  categories  │
//! │                                                             *           │
//! │                                                             │           │
//! │                                                          Category       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identifier Scheme
//! - UUID v4 (hyphenated text): Product, Store, Sale, User
//! - Integer surrogate: Department, City, Category, UserRole, StoreProduct,
//!   SaleProduct

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Geography
// =============================================================================

/// A department (state/province) grouping cities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// A city inside a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct City {
    pub id: i64,
    pub name: String,
    pub department_id: i64,
}

// =============================================================================
// Catalog
// =============================================================================

/// A product category. Names are unique across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A product available in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, at most 128 characters.
    pub name: String,

    pub description: String,

    /// Price in the smallest currency unit.
    pub price_cents: i64,

    /// Set once when the row is created.
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// A physical store located in a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Store {
    pub id: String,
    pub name: String,
    pub city_id: i64,
}

/// Stock of one product at one location inside a store.
///
/// Several rows may exist for the same (store, product) pair, one per
/// storage location; consumers sum them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StoreProduct {
    pub id: i64,
    pub stock: i64,
    /// Where in the store the units are kept (aisle, shelf, bin...).
    pub address: String,
    pub store_id: String,
    pub product_id: String,
}

/// Stock of a product in a store, summed across all of its StoreProduct rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockLevel {
    pub product_id: String,
    pub product_name: String,
    pub total_stock: i64,
    /// Number of StoreProduct rows that contributed to `total_stock`.
    pub locations: i64,
}

// =============================================================================
// Identity
// =============================================================================

/// The role a user plays in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Role {
    Admin,
    User,
    Manager,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::User, Role::Manager];

    /// Returns the stored representation of the role.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
            Role::Manager => "MANAGER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            "MANAGER" => Ok(Role::Manager),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: Role::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            }),
        }
    }
}

/// A role row referenced by users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserRole {
    pub id: i64,
    pub role: Role,
}

/// A customer or staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string. Never leaves the service layer.
    pub password_hash: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub role_id: i64,
    pub city_id: i64,
}

// =============================================================================
// Sales
// =============================================================================

/// A sale made to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    /// Assigned at creation, immutable afterwards.
    pub sale_date: DateTime<Utc>,
    /// Total in the smallest currency unit.
    pub total_amount: i64,
    pub user_id: String,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_amount)
    }

    /// Calendar day (UTC) the sale belongs to.
    pub fn sale_day(&self) -> NaiveDate {
        self.sale_date.date_naive()
    }
}

/// A line of a sale: how many units of a product were sold.
///
/// The same product may appear on several lines of one sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleProduct {
    pub id: i64,
    pub quantity: i64,
    pub sale_id: String,
    pub product_id: String,
}

// =============================================================================
// Analytics
// =============================================================================

/// A product together with the total units sold across all sale lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSales {
    pub product: Product,
    pub units_sold: i64,
}

// =============================================================================
// Query Parameters
// =============================================================================

/// Direction of a sorted listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// A case-insensitive name filter.
///
/// ## Variants
/// - `Contains`: plain text, matched anywhere in the name. `%`, `_` and `\`
///   in the text are matched literally.
/// - `Like`: raw SQL `LIKE` syntax; `%` and `_` are wildcards and `\`
///   escapes the next character.
///
/// ## Example
/// ```rust
/// use commerce_core::NamePattern;
///
/// assert_eq!(NamePattern::Contains("an".into()).to_like_pattern(), "%an%");
/// assert_eq!(NamePattern::Contains("10%".into()).to_like_pattern(), "%10\\%%");
/// assert_eq!(NamePattern::Like("A_a".into()).to_like_pattern(), "A_a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
#[ts(export)]
pub enum NamePattern {
    Contains(String),
    Like(String),
}

impl NamePattern {
    /// Renders the pattern for `LIKE ? ESCAPE '\'`.
    pub fn to_like_pattern(&self) -> String {
        match self {
            NamePattern::Contains(text) => {
                let mut pattern = String::with_capacity(text.len() + 2);
                pattern.push('%');
                for c in text.chars() {
                    if matches!(c, '%' | '_' | '\\') {
                        pattern.push('\\');
                    }
                    pattern.push(c);
                }
                pattern.push('%');
                pattern
            }
            NamePattern::Like(raw) => raw.clone(),
        }
    }
}

impl From<&str> for NamePattern {
    fn from(text: &str) -> Self {
        NamePattern::Contains(text.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!(" manager ".parse::<Role>().unwrap(), Role::Manager);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = "OWNER".parse::<Role>().unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
    }

    #[test]
    fn test_role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        let pattern = NamePattern::Contains("a_b%c\\".to_string()).to_like_pattern();
        assert_eq!(pattern, "%a\\_b\\%c\\\\%");
    }

    #[test]
    fn test_like_pattern_is_passed_through() {
        let pattern = NamePattern::Like("J%n".to_string()).to_like_pattern();
        assert_eq!(pattern, "J%n");
    }

    #[test]
    fn test_sort_order_defaults_to_ascending() {
        assert_eq!(SortOrder::default(), SortOrder::Asc);
        assert_eq!(serde_json::to_string(&SortOrder::Desc).unwrap(), "\"desc\"");
    }

    #[test]
    fn test_sale_day_uses_utc_date() {
        let sale = Sale {
            id: "s".to_string(),
            sale_date: "2026-03-01T23:30:00Z".parse().unwrap(),
            total_amount: 1500,
            user_id: "u".to_string(),
        };
        assert_eq!(sale.sale_day(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(sale.total().cents(), 1500);
    }
}
