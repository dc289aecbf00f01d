use async_trait::async_trait;
use uuid::Uuid;

use crate::error::OrderResult;
use crate::models::{Order, UpdateOrder};

/// Orders plus the product stock they draw on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: Order) -> OrderResult<Order>;

    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>>;

    async fn list_all(&self) -> OrderResult<Vec<Order>>;

    async fn update(&self, id: Uuid, input: UpdateOrder) -> OrderResult<Option<Order>>;

    async fn delete(&self, id: Uuid) -> OrderResult<bool>;

    /// Current `unitPrice` of a product, `None` when it does not exist
    async fn product_price(&self, product_id: Uuid) -> OrderResult<Option<i64>>;

    /// Decrement `availableStock` only if at least `quantity` is left.
    /// Returns whether the stock was taken.
    async fn take_stock(&self, product_id: Uuid, quantity: i64) -> OrderResult<bool>;

    /// Undo a successful [`take_stock`](OrderRepository::take_stock).
    async fn restore_stock(&self, product_id: Uuid, quantity: i64) -> OrderResult<()>;
}
