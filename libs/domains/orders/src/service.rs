//! Order Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{OrderError, OrderResult};
use crate::models::{CartItem, CreateOrder, Order, UpdateOrder};
use crate::repository::OrderRepository;

pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Price every line item, take stock for each and store the order.
    ///
    /// Stock already taken is given back when a later item is short, a
    /// product is missing or the insert fails.
    #[instrument(skip(self, input), fields(user_id = %input.user_id, items = input.cart_items.len()))]
    pub async fn create_order(&self, input: CreateOrder) -> OrderResult<Order> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let mut cart_items = Vec::with_capacity(input.cart_items.len());
        for item in &input.cart_items {
            let item_price = self
                .repository
                .product_price(item.product_id)
                .await?
                .ok_or(OrderError::ProductNotFound(item.product_id))?;
            cart_items.push(CartItem {
                product_id: item.product_id,
                quantity: item.quantity,
                item_price,
            });
        }

        let mut taken: Vec<(Uuid, i64)> = Vec::with_capacity(cart_items.len());
        for item in &cart_items {
            match self
                .repository
                .take_stock(item.product_id, item.quantity)
                .await
            {
                Ok(true) => taken.push((item.product_id, item.quantity)),
                Ok(false) => {
                    self.restore(&taken).await;
                    return Err(OrderError::InsufficientStock {
                        product_id: item.product_id,
                        requested: item.quantity,
                    });
                }
                Err(e) => {
                    self.restore(&taken).await;
                    return Err(e);
                }
            }
        }

        let order = Order::new(input, cart_items);
        match self.repository.insert(order).await {
            Ok(order) => Ok(order),
            Err(e) => {
                self.restore(&taken).await;
                Err(e)
            }
        }
    }

    async fn restore(&self, taken: &[(Uuid, i64)]) {
        for (product_id, quantity) in taken {
            if let Err(e) = self.repository.restore_stock(*product_id, *quantity).await {
                tracing::error!(product_id = %product_id, quantity, error = %e, "Failed to restore stock");
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> OrderResult<Vec<Order>> {
        self.repository.list_all().await
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: Uuid) -> OrderResult<Order> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))
    }

    #[instrument(skip(self, input))]
    pub async fn update_order(&self, id: Uuid, input: UpdateOrder) -> OrderResult<Order> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        self.repository
            .update(id, input)
            .await?
            .ok_or(OrderError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: Uuid) -> OrderResult<()> {
        if !self.repository.delete(id).await? {
            return Err(OrderError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CartItemInput, PaymentMethod};
    use crate::repository::MockOrderRepository;
    use mockall::predicate::eq;

    fn create_input(items: &[(Uuid, i64)]) -> CreateOrder {
        CreateOrder {
            cart_items: items
                .iter()
                .map(|(product_id, quantity)| CartItemInput {
                    product_id: *product_id,
                    quantity: *quantity,
                })
                .collect(),
            payment_method: PaymentMethod::CashOnDelivery,
            payment_details: serde_json::json!({}),
            shipping_price: 4.5,
            is_paid: false,
            user_id: Uuid::now_v7(),
            shipping: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_order_prices_items_and_totals() {
        let basil = Uuid::now_v7();
        let pot = Uuid::now_v7();
        let mut mock_repo = MockOrderRepository::new();

        mock_repo
            .expect_product_price()
            .with(eq(basil))
            .returning(|_| Ok(Some(350)));
        mock_repo
            .expect_product_price()
            .with(eq(pot))
            .returning(|_| Ok(Some(1500)));
        mock_repo.expect_take_stock().times(2).returning(|_, _| Ok(true));
        mock_repo.expect_restore_stock().never();
        mock_repo.expect_insert().times(1).returning(Ok);

        let service = OrderService::new(mock_repo);
        let order = service
            .create_order(create_input(&[(basil, 2), (pot, 1)]))
            .await
            .unwrap();

        assert_eq!(order.cart_items[0].item_price, 350);
        assert_eq!(order.cart_items[1].item_price, 1500);
        assert_eq!(order.total_price, 2200.0);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found_and_takes_no_stock() {
        let missing = Uuid::now_v7();
        let mut mock_repo = MockOrderRepository::new();

        mock_repo.expect_product_price().returning(|_| Ok(None));
        mock_repo.expect_take_stock().never();
        mock_repo.expect_insert().never();

        let service = OrderService::new(mock_repo);
        let result = service.create_order(create_input(&[(missing, 1)])).await;

        assert!(matches!(result, Err(OrderError::ProductNotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn test_insufficient_stock_restores_earlier_items() {
        let plenty = Uuid::now_v7();
        let scarce = Uuid::now_v7();
        let mut mock_repo = MockOrderRepository::new();

        mock_repo.expect_product_price().returning(|_| Ok(Some(100)));
        mock_repo
            .expect_take_stock()
            .with(eq(plenty), eq(2))
            .returning(|_, _| Ok(true));
        mock_repo
            .expect_take_stock()
            .with(eq(scarce), eq(5))
            .returning(|_, _| Ok(false));
        mock_repo
            .expect_restore_stock()
            .with(eq(plenty), eq(2))
            .times(1)
            .returning(|_, _| Ok(()));
        mock_repo.expect_insert().never();

        let service = OrderService::new(mock_repo);
        let result = service
            .create_order(create_input(&[(plenty, 2), (scarce, 5)]))
            .await;

        assert!(matches!(
            result,
            Err(OrderError::InsufficientStock { product_id, requested: 5 }) if product_id == scarce
        ));
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let mut mock_repo = MockOrderRepository::new();
        mock_repo.expect_product_price().never();

        let service = OrderService::new(mock_repo);
        let result = service.create_order(create_input(&[])).await;
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_order_is_not_found() {
        let mut mock_repo = MockOrderRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let service = OrderService::new(mock_repo);
        let id = Uuid::now_v7();
        assert!(matches!(
            service.delete_order(id).await,
            Err(OrderError::NotFound(missing)) if missing == id
        ));
    }
}
