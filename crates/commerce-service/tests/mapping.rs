mod common;

use commerce_core::payload::NewCategory;
use commerce_core::Role;
use serde_json::Value;

#[tokio::test]
async fn serialized_graph_has_no_cycles() {
    let commerce = common::commerce().await;
    let catalog = commerce.catalog();
    let tools = catalog
        .create_category(NewCategory {
            name: "Tools".to_string(),
        })
        .await
        .unwrap();
    let hammer = common::product(&commerce, "Hammer", 1_299).await;
    catalog.link_product_category(&hammer.id, tools.id).await.unwrap();

    let product = serde_json::to_value(catalog.get_product(&hammer.id).await.unwrap()).unwrap();
    assert!(product.get("categories").is_none());
    assert_eq!(product["price"], 1_299);
    assert!(product["createdAt"].as_str().unwrap().ends_with('Z'));

    let category = serde_json::to_value(catalog.get_category(tools.id).await.unwrap()).unwrap();
    let products = category["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], Value::String(hammer.id.clone()));
    assert!(products[0].get("categories").is_none());

    let summaries =
        serde_json::to_value(catalog.categories_for_product(&hammer.id).await.unwrap()).unwrap();
    assert_eq!(summaries[0]["name"], "Tools");
    assert!(summaries[0].get("products").is_none());
}

#[tokio::test]
async fn serialized_user_has_no_credentials() {
    let commerce = common::commerce().await;
    let city = common::city(&commerce, "Antioquia", "Medellin").await;
    let role = common::role(&commerce, Role::Admin).await;
    let user = commerce
        .identity()
        .create_user(common::new_user("agomez", "Ana", role, city))
        .await
        .unwrap();

    let json = serde_json::to_value(&user).unwrap();
    let object = json.as_object().unwrap();
    assert!(object.keys().all(|k| !k.to_lowercase().contains("password")));
    assert_eq!(json["roleId"], role);
    assert_eq!(json["cityId"], city);
    assert_eq!(json["firstName"], "Ana");
}
