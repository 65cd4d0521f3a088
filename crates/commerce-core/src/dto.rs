//! # Transfer Models
//!
//! Outbound shapes handed to callers of the service layer. Each DTO is a
//! one-way projection of a persistence entity.
//!
//! ## Cycle Breaking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │           Product ◄──── product_categories ────► Category               │
//! │                                                                         │
//! │  A naive graph serializer would recurse forever:                        │
//! │    Category → products → categories → products → ...                    │
//! │                                                                         │
//! │  Two one-directional read paths instead:                                │
//! │                                                                         │
//! │    CategoryDto { id, name, products: [ProductDto] }                     │
//! │                                        └─ no categories field           │
//! │                                                                         │
//! │    categories_for_product(id) → [CategorySummaryDto { id, name }]       │
//! │                                   └─ no products field                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every other child carries its parent as a plain id (`cityId`, `roleId`,
//! `saleId`, ...). Field names serialize in camelCase and timestamps as
//! RFC 3339 UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{
    Category, City, Department, Product, ProductSales, Role, Sale, SaleProduct, StockLevel,
    Store, StoreProduct, User, UserRole,
};

// =============================================================================
// Geography
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DepartmentDto {
    pub id: i64,
    pub name: String,
}

impl From<Department> for DepartmentDto {
    fn from(d: Department) -> Self {
        DepartmentDto {
            id: d.id,
            name: d.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CityDto {
    pub id: i64,
    pub name: String,
    pub department_id: i64,
}

impl From<City> for CityDto {
    fn from(c: City) -> Self {
        CityDto {
            id: c.id,
            name: c.name,
            department_id: c.department_id,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A product as seen by callers. Never carries its categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            price: p.price(),
            id: p.id,
            name: p.name,
            description: p.description,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// A category together with the products linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
    pub products: Vec<ProductDto>,
}

impl CategoryDto {
    /// Builds the DTO from a category and its linked products.
    pub fn from_parts(category: Category, products: Vec<Product>) -> Self {
        CategoryDto {
            id: category.id,
            name: category.name,
            products: products.into_iter().map(ProductDto::from).collect(),
        }
    }
}

/// A category without its products, used on the product-to-category path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategorySummaryDto {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategorySummaryDto {
    fn from(c: Category) -> Self {
        CategorySummaryDto {
            id: c.id,
            name: c.name,
        }
    }
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoreDto {
    pub id: String,
    pub name: String,
    pub city_id: i64,
}

impl From<Store> for StoreDto {
    fn from(s: Store) -> Self {
        StoreDto {
            id: s.id,
            name: s.name,
            city_id: s.city_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoreProductDto {
    pub id: i64,
    pub stock: i64,
    pub address: String,
    pub store_id: String,
    pub product_id: String,
}

impl From<StoreProduct> for StoreProductDto {
    fn from(sp: StoreProduct) -> Self {
        StoreProductDto {
            id: sp.id,
            stock: sp.stock,
            address: sp.address,
            store_id: sp.store_id,
            product_id: sp.product_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockLevelDto {
    pub product_id: String,
    pub product_name: String,
    pub total_stock: i64,
    pub locations: i64,
}

impl From<StockLevel> for StockLevelDto {
    fn from(l: StockLevel) -> Self {
        StockLevelDto {
            product_id: l.product_id,
            product_name: l.product_name,
            total_stock: l.total_stock,
            locations: l.locations,
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserRoleDto {
    pub id: i64,
    pub role: Role,
}

impl From<UserRole> for UserRoleDto {
    fn from(r: UserRole) -> Self {
        UserRoleDto {
            id: r.id,
            role: r.role,
        }
    }
}

/// A user as seen by callers. The password hash is dropped here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub role_id: i64,
    pub city_id: i64,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        UserDto {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            username: u.username,
            email: u.email,
            phone: u.phone,
            created_at: u.created_at,
            role_id: u.role_id,
            city_id: u.city_id,
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleDto {
    pub id: String,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    pub total_amount: Money,
    pub user_id: String,
}

impl From<Sale> for SaleDto {
    fn from(s: Sale) -> Self {
        SaleDto {
            total_amount: s.total(),
            id: s.id,
            sale_date: s.sale_date,
            user_id: s.user_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleProductDto {
    pub id: i64,
    pub quantity: i64,
    pub sale_id: String,
    pub product_id: String,
}

impl From<SaleProduct> for SaleProductDto {
    fn from(sp: SaleProduct) -> Self {
        SaleProductDto {
            id: sp.id,
            quantity: sp.quantity,
            sale_id: sp.sale_id,
            product_id: sp.product_id,
        }
    }
}

// =============================================================================
// Analytics
// =============================================================================

/// One row of the best-seller report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BestSellerDto {
    pub product: ProductDto,
    pub units_sold: i64,
}

impl From<ProductSales> for BestSellerDto {
    fn from(ps: ProductSales) -> Self {
        BestSellerDto {
            product: ps.product.into(),
            units_sold: ps.units_sold,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
