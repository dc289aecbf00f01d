//! Integration tests for the Reviews domain
//!
//! Checks the product aggregate kept by each review; needs Docker:
//! `cargo test -p domain_reviews -- --ignored`

use domain_products::{
    CreateProduct, MongoProductRepository, ProductRepository, ProductStatus, ProductUnit,
    MAX_EMBEDDED_REVIEWS,
};
use domain_reviews::*;
use test_utils::{assertions::*, TestDataBuilder, TestMongo};
use uuid::Uuid;

fn input(product: Uuid, user_id: Uuid, rating: i32) -> CreateReview {
    CreateReview {
        review: format!("Rated {rating} out of five"),
        rating,
        user_id,
        product,
    }
}

async fn fern(repo: &MongoProductRepository) -> Uuid {
    repo.create(CreateProduct {
        title: "Boston fern".to_string(),
        description: "Loves humidity and indirect light".to_string(),
        unit_price: 1800,
        unit: ProductUnit::Pot,
        available_stock: 5,
        media: vec!["https://cdn.example.com/fern.jpg".to_string()],
        categories: vec!["indoor".to_string()],
        dimension: None,
        seller_id: None,
        status: ProductStatus::Public,
    })
    .await
    .unwrap()
    .id
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_reviews_update_product_aggregate() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("review_aggregate");
    let db = mongo.database(&builder.database_name());
    let products = MongoProductRepository::new(&db);
    let product_id = fern(&products).await;

    let service = ReviewService::new(MongoReviewRepository::new(&db));
    service
        .create_review(input(product_id, builder.uuid(1), 4))
        .await
        .unwrap();
    let latest = service
        .create_review(input(product_id, builder.uuid(2), 2))
        .await
        .unwrap();

    let product = assert_some(products.get_by_id(product_id).await.unwrap(), "product");
    assert_eq!(product.review_count, 2);
    assert!((product.average_rating - 3.0).abs() < f64::EPSILON);
    assert_eq!(product.reviews.len(), 2);
    assert_uuid_eq(product.reviews[0].id, latest.id, "newest embedded review");

    let listed = service.list_product_reviews(product_id).await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_embedded_reviews_are_capped() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("review_cap");
    let db = mongo.database(&builder.database_name());
    let products = MongoProductRepository::new(&db);
    let product_id = fern(&products).await;

    let service = ReviewService::new(MongoReviewRepository::new(&db));
    let total = MAX_EMBEDDED_REVIEWS as u64 + 2;
    for n in 0..total {
        service
            .create_review(input(product_id, builder.uuid(n + 1), 5))
            .await
            .unwrap();
    }

    let product = assert_some(products.get_by_id(product_id).await.unwrap(), "product");
    assert_eq!(product.review_count, total as i64);
    assert_eq!(product.reviews.len(), MAX_EMBEDDED_REVIEWS as usize);
    assert!((product.average_rating - 5.0).abs() < f64::EPSILON);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_review_of_missing_product_is_removed() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("review_missing_product");
    let db = mongo.database(&builder.database_name());

    let missing = builder.uuid(99);
    let service = ReviewService::new(MongoReviewRepository::new(&db));
    let result = service
        .create_review(input(missing, builder.user_id(), 3))
        .await;

    assert!(matches!(result, Err(ReviewError::ProductNotFound(id)) if id == missing));
    assert!(service.list_product_reviews(missing).await.unwrap().is_empty());
}
