//! MongoDB implementation of OrderRepository

use async_trait::async_trait;
use database::mongodb::serde_helpers::{timestamp_to_bson, uuid_to_bson};
use domain_products::PRODUCTS_COLLECTION;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::OrderResult;
use crate::models::{Order, UpdateOrder, ORDERS_COLLECTION};
use crate::repository::OrderRepository;

pub struct MongoOrderRepository {
    orders: Collection<Order>,
    products: Collection<Document>,
}

impl MongoOrderRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            orders: db.collection::<Order>(ORDERS_COLLECTION),
            products: db.collection::<Document>(PRODUCTS_COLLECTION),
        }
    }

    pub async fn init_indexes(&self) -> OrderResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "userId": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_user_created".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "cartItems.productId": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_cart_product".to_string())
                        .build(),
                )
                .build(),
        ];

        self.orders.create_indexes(indexes).await?;
        tracing::info!("Order indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": uuid_to_bson(&id) }
    }
}

/// Stock guard plus decrement, applied as one conditional update.
/// Both stock updates bump `__v` so a product edit holding the old version
/// is rejected instead of rewriting the counters.
pub(crate) fn take_stock_update(product_id: Uuid, quantity: i64) -> (Document, Document) {
    let filter = doc! {
        "_id": uuid_to_bson(&product_id),
        "availableStock": { "$gte": quantity },
    };
    let update = doc! {
        "$inc": { "availableStock": -quantity, "soldAmount": quantity, "__v": 1_i64 },
        "$set": { "updatedAt": timestamp_to_bson(&chrono::Utc::now()) },
    };
    (filter, update)
}

/// Inverse of [`take_stock_update`], used to roll back a failed order.
pub(crate) fn restore_stock_update(product_id: Uuid, quantity: i64) -> (Document, Document) {
    let filter = doc! { "_id": uuid_to_bson(&product_id) };
    let update = doc! {
        "$inc": { "availableStock": quantity, "soldAmount": -quantity, "__v": 1_i64 },
        "$set": { "updatedAt": timestamp_to_bson(&chrono::Utc::now()) },
    };
    (filter, update)
}

fn bson_to_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        Bson::Double(f) if f.fract() == 0.0 => Some(*f as i64),
        _ => None,
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    #[instrument(skip(self, order), fields(order_id = %order.id, items = order.cart_items.len()))]
    async fn insert(&self, order: Order) -> OrderResult<Order> {
        self.orders.insert_one(&order).await?;

        tracing::info!(order_id = %order.id, total_price = order.total_price, "Order created successfully");
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>> {
        let order = self.orders.find_one(Self::id_filter(id)).await?;
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> OrderResult<Vec<Order>> {
        let cursor = self
            .orders
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?;
        let orders: Vec<Order> = cursor.try_collect().await?;
        Ok(orders)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateOrder) -> OrderResult<Option<Order>> {
        let Some(mut order) = self.orders.find_one(Self::id_filter(id)).await? else {
            return Ok(None);
        };

        order.apply_update(input);
        self.orders.replace_one(Self::id_filter(id), &order).await?;

        tracing::info!(order_id = %id, "Order updated successfully");
        Ok(Some(order))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> OrderResult<bool> {
        let result = self.orders.delete_one(Self::id_filter(id)).await?;
        if result.deleted_count > 0 {
            tracing::info!(order_id = %id, "Order deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn product_price(&self, product_id: Uuid) -> OrderResult<Option<i64>> {
        let product = self
            .products
            .find_one(doc! { "_id": uuid_to_bson(&product_id) })
            .projection(doc! { "unitPrice": 1 })
            .await?;

        Ok(product
            .as_ref()
            .and_then(|product| product.get("unitPrice"))
            .and_then(bson_to_i64))
    }

    #[instrument(skip(self))]
    async fn take_stock(&self, product_id: Uuid, quantity: i64) -> OrderResult<bool> {
        let (filter, update) = take_stock_update(product_id, quantity);
        let result = self.products.update_one(filter, update).await?;
        Ok(result.modified_count == 1)
    }

    #[instrument(skip(self))]
    async fn restore_stock(&self, product_id: Uuid, quantity: i64) -> OrderResult<()> {
        let (filter, update) = restore_stock_update(product_id, quantity);
        self.products.update_one(filter, update).await?;
        tracing::info!(product_id = %product_id, quantity, "Stock restored");
        Ok(())
    }
}
