//! Orders Domain
//!
//! Orders capture item prices at placement time and draw down product stock
//! with conditional updates, so an order never oversells.
//!
//! ```text
//! POST /orders
//!   ├─ price each item from products.unitPrice
//!   ├─ take stock per item  (availableStock >= quantity)
//!   │     └─ short? restore what was taken, fail
//!   └─ insert order with totalPrice = Σ quantity × itemPrice
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use handlers::ApiDoc;
pub use models::{
    CartItem, CartItemInput, CreateOrder, Order, PaymentMethod, Shipping, ShippingStatus,
    UpdateOrder, ORDERS_COLLECTION,
};
pub use mongodb::MongoOrderRepository;
pub use repository::OrderRepository;
pub use service::OrderService;
