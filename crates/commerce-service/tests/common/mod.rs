//! Shared setup for the service integration tests.

#![allow(dead_code)]

use commerce_core::dto::{ProductDto, SaleDto, UserDto};
use commerce_core::payload::{
    NewCity, NewDepartment, NewProduct, NewSale, NewSaleProduct, NewUser, NewUserRole,
};
use commerce_core::Role;
use commerce_service::{AppConfig, Commerce};

pub async fn commerce() -> Commerce {
    Commerce::connect(&AppConfig::in_memory()).await.unwrap()
}

pub async fn product(commerce: &Commerce, name: &str, price: i64) -> ProductDto {
    commerce
        .catalog()
        .create_product(NewProduct {
            name: name.to_string(),
            description: format!("{name} description"),
            price,
        })
        .await
        .unwrap()
}

/// Creates a department and a city inside it; returns the city id.
pub async fn city(commerce: &Commerce, department: &str, city: &str) -> i64 {
    let geography = commerce.geography();
    let department = geography
        .create_department(NewDepartment {
            name: department.to_string(),
        })
        .await
        .unwrap();
    geography
        .create_city(NewCity {
            name: city.to_string(),
            department_id: department.id,
        })
        .await
        .unwrap()
        .id
}

pub async fn role(commerce: &Commerce, role: Role) -> i64 {
    commerce
        .identity()
        .create_role(NewUserRole { role })
        .await
        .unwrap()
        .id
}

pub fn new_user(username: &str, first_name: &str, role_id: i64, city_id: i64) -> NewUser {
    NewUser {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "correct horse".to_string(),
        phone: "3001234567".to_string(),
        role_id,
        city_id,
    }
}

/// Creates a buyer with its own role and city.
pub async fn buyer(commerce: &Commerce, username: &str) -> UserDto {
    let city_id = city(commerce, &format!("{username} dept"), &format!("{username} city")).await;
    let role_id = role(commerce, Role::User).await;
    commerce
        .identity()
        .create_user(new_user(username, "Buyer", role_id, city_id))
        .await
        .unwrap()
}

pub async fn sale(commerce: &Commerce, user_id: &str, total: i64) -> SaleDto {
    commerce
        .sales()
        .create_sale(NewSale {
            total_amount: total,
            user_id: user_id.to_string(),
        })
        .await
        .unwrap()
}

pub async fn line(commerce: &Commerce, sale_id: &str, product_id: &str, quantity: i64) {
    commerce
        .sales()
        .create_sale_product(NewSaleProduct {
            quantity,
            sale_id: sale_id.to_string(),
            product_id: product_id.to_string(),
        })
        .await
        .unwrap();
}
