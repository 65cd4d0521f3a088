mod common;

use commerce_core::payload::SaleProductPatch;
use commerce_service::{AnalyticsService, ErrorCode};

#[tokio::test]
async fn ranking_sums_quantities_across_lines() {
    let commerce = common::commerce().await;
    let a = common::product(&commerce, "A", 100).await;
    let b = common::product(&commerce, "B", 100).await;
    common::product(&commerce, "Never Sold", 100).await;

    let buyer = common::buyer(&commerce, "alice").await;
    let first = common::sale(&commerce, &buyer.id, 800).await;
    let second = common::sale(&commerce, &buyer.id, 500).await;
    common::line(&commerce, &first.id, &a.id, 5).await;
    common::line(&commerce, &first.id, &b.id, 3).await;
    common::line(&commerce, &second.id, &a.id, 2).await;

    let analytics = commerce.analytics();

    let all = analytics.best_sellers(None).await.unwrap();
    assert_eq!(all, vec![a.clone(), b.clone()]);

    let top = analytics.best_sellers(Some(1)).await.unwrap();
    assert_eq!(top, vec![a.clone()]);

    let report = analytics.best_seller_report(None).await.unwrap();
    let units: Vec<_> = report
        .iter()
        .map(|r| (r.product.name.as_str(), r.units_sold))
        .collect();
    assert_eq!(units, vec![("A", 7), ("B", 3)]);
}

#[tokio::test]
async fn ties_break_on_product_id() {
    let commerce = common::commerce().await;
    let x = common::product(&commerce, "X", 100).await;
    let y = common::product(&commerce, "Y", 100).await;

    let buyer = common::buyer(&commerce, "bob").await;
    let sale = common::sale(&commerce, &buyer.id, 400).await;
    common::line(&commerce, &sale.id, &x.id, 2).await;
    common::line(&commerce, &sale.id, &y.id, 2).await;

    let mut expected = vec![x.id.clone(), y.id.clone()];
    expected.sort();

    let ranked: Vec<_> = commerce
        .analytics()
        .best_sellers(None)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ranked, expected);
}

#[tokio::test]
async fn ranking_follows_line_updates() {
    let commerce = common::commerce().await;
    let a = common::product(&commerce, "A", 100).await;
    let b = common::product(&commerce, "B", 100).await;

    let buyer = common::buyer(&commerce, "carol").await;
    let sale = common::sale(&commerce, &buyer.id, 100).await;
    common::line(&commerce, &sale.id, &a.id, 4).await;
    common::line(&commerce, &sale.id, &b.id, 1).await;

    let lines = commerce.sales().lines_for_sale(&sale.id).await.unwrap();
    let b_line = lines.iter().find(|l| l.product_id == b.id).unwrap();
    commerce
        .sales()
        .update_sale_product(
            b_line.id,
            SaleProductPatch {
                quantity: Some(9),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let ranked = commerce.analytics().best_sellers(None).await.unwrap();
    assert_eq!(ranked, vec![b, a]);
}

#[tokio::test]
async fn empty_and_zero_limits_return_nothing() {
    let commerce = common::commerce().await;
    let analytics = commerce.analytics();
    assert!(analytics.best_sellers(None).await.unwrap().is_empty());

    let a = common::product(&commerce, "A", 100).await;
    let buyer = common::buyer(&commerce, "dave").await;
    let sale = common::sale(&commerce, &buyer.id, 100).await;
    common::line(&commerce, &sale.id, &a.id, 1).await;

    assert!(analytics.best_sellers(Some(0)).await.unwrap().is_empty());
}

#[tokio::test]
async fn limits_outside_the_cap_are_rejected() {
    let commerce = common::commerce().await;
    let analytics = AnalyticsService::new(commerce.database().clone(), 10);

    let negative = analytics.best_sellers(Some(-1)).await.unwrap_err();
    assert_eq!(negative.code(), ErrorCode::ValidationError);

    let too_many = analytics.best_seller_report(Some(11)).await.unwrap_err();
    assert_eq!(too_many.code(), ErrorCode::ValidationError);

    assert!(analytics.best_sellers(Some(10)).await.is_ok());
}
