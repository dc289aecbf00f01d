//! Integration tests for the Orders domain
//!
//! Orders draw stock from real product documents; needs Docker:
//! `cargo test -p domain_orders -- --ignored`

use domain_orders::*;
use domain_products::{
    CreateProduct, MongoProductRepository, Product, ProductRepository, ProductStatus, ProductUnit,
};
use test_utils::{assertions::*, TestDataBuilder, TestMongo};
use uuid::Uuid;

async fn product(repo: &MongoProductRepository, title: &str, price: i64, stock: i64) -> Product {
    repo.create(CreateProduct {
        title: title.to_string(),
        description: "Grown in peat-free compost".to_string(),
        unit_price: price,
        unit: ProductUnit::Item,
        available_stock: stock,
        media: vec!["https://cdn.example.com/item.jpg".to_string()],
        categories: vec!["garden".to_string()],
        dimension: None,
        seller_id: None,
        status: ProductStatus::Public,
    })
    .await
    .unwrap()
}

fn order(user_id: Uuid, items: &[(Uuid, i64)]) -> CreateOrder {
    CreateOrder {
        cart_items: items
            .iter()
            .map(|(product_id, quantity)| CartItemInput {
                product_id: *product_id,
                quantity: *quantity,
            })
            .collect(),
        payment_method: PaymentMethod::CreditCard,
        payment_details: serde_json::json!({ "last4": "4242" }),
        shipping_price: 5.0,
        is_paid: true,
        user_id,
        shipping: vec![],
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_order_takes_stock_and_totals() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("order_takes_stock");
    let db = mongo.database(&builder.database_name());
    let products = MongoProductRepository::new(&db);

    let seeds = product(&products, "Tomato seeds", 250, 10).await;
    let trowel = product(&products, "Hand trowel", 1200, 3).await;

    let service = OrderService::new(MongoOrderRepository::new(&db));
    let created = service
        .create_order(order(builder.user_id(), &[(seeds.id, 4), (trowel.id, 1)]))
        .await
        .unwrap();

    assert_eq!(created.total_price, 2200.0);
    assert_eq!(created.cart_items[0].item_price, 250);

    let seeds = assert_some(products.get_by_id(seeds.id).await.unwrap(), "seeds");
    let trowel = assert_some(products.get_by_id(trowel.id).await.unwrap(), "trowel");
    assert_eq!(seeds.available_stock, 6);
    assert_eq!(seeds.sold_amount, 4);
    assert_eq!(trowel.available_stock, 2);

    let stored = service.get_order(created.id).await.unwrap();
    assert_uuid_eq(stored.id, created.id, "stored order id");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_short_stock_leaves_products_untouched() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("order_short_stock");
    let db = mongo.database(&builder.database_name());
    let products = MongoProductRepository::new(&db);

    let seeds = product(&products, "Tomato seeds", 250, 10).await;
    let trowel = product(&products, "Hand trowel", 1200, 1).await;

    let service = OrderService::new(MongoOrderRepository::new(&db));
    let result = service
        .create_order(order(builder.user_id(), &[(seeds.id, 2), (trowel.id, 5)]))
        .await;

    assert!(
        matches!(result, Err(OrderError::InsufficientStock { product_id, .. }) if product_id == trowel.id),
        "Expected InsufficientStock, got {:?}",
        result
    );

    let seeds = assert_some(products.get_by_id(seeds.id).await.unwrap(), "seeds");
    assert_eq!(seeds.available_stock, 10);
    assert_eq!(seeds.sold_amount, 0);
    assert!(service.list_orders().await.unwrap().is_empty());
}
