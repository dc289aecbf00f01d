use chrono::{DateTime, Utc};
use database::mongodb::serde_helpers::{timestamp, uuid_as_string};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const ORDERS_COLLECTION: &str = "orders";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    CashOnDelivery,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShippingStatus {
    #[default]
    Pending,
    Approved,
    Shipped,
    Cancelled,
    Delivered,
    Refunded,
}

/// Line item with the unit price captured when the order was placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(with = "uuid_as_string")]
    pub product_id: Uuid,
    pub quantity: i64,
    pub item_price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shipping {
    /// Address document id
    #[serde(with = "uuid_as_string")]
    pub address: Uuid,
    #[serde(default)]
    pub status: ShippingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id", with = "uuid_as_string")]
    pub id: Uuid,
    pub cart_items: Vec<CartItem>,
    pub payment_method: PaymentMethod,
    #[schema(value_type = Object)]
    pub payment_details: serde_json::Value,
    pub shipping_price: f64,
    /// Sum of quantity × itemPrice, rounded to cents
    pub total_price: f64,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(with = "uuid_as_string")]
    pub user_id: Uuid,
    #[serde(default)]
    pub shipping: Vec<Shipping>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[validate(length(min = 1, message = "An order needs at least one item."), nested)]
    pub cart_items: Vec<CartItemInput>,
    pub payment_method: PaymentMethod,
    #[schema(value_type = Object)]
    pub payment_details: serde_json::Value,
    #[validate(range(min = 0.0))]
    pub shipping_price: f64,
    #[serde(default)]
    pub is_paid: bool,
    pub user_id: Uuid,
    #[serde(default)]
    pub shipping: Vec<Shipping>,
}

/// Partial update. Cart items are fixed once stock has been taken.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrder {
    pub payment_method: Option<PaymentMethod>,
    #[schema(value_type = Option<Object>)]
    pub payment_details: Option<serde_json::Value>,
    #[validate(range(min = 0.0))]
    pub shipping_price: Option<f64>,
    pub is_paid: Option<bool>,
    pub shipping: Option<Vec<Shipping>>,
}

fn default_quantity() -> i64 {
    1
}

pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Σ quantity × itemPrice
pub fn order_total(items: &[CartItem]) -> f64 {
    let sum: f64 = items
        .iter()
        .map(|item| item.quantity as f64 * item.item_price as f64)
        .sum();
    round_to_cents(sum)
}

impl Order {
    pub fn new(input: CreateOrder, cart_items: Vec<CartItem>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            total_price: order_total(&cart_items),
            cart_items,
            payment_method: input.payment_method,
            payment_details: input.payment_details,
            shipping_price: input.shipping_price,
            is_paid: input.is_paid,
            user_id: input.user_id,
            shipping: input.shipping,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateOrder) {
        if let Some(payment_method) = update.payment_method {
            self.payment_method = payment_method;
        }
        if let Some(payment_details) = update.payment_details {
            self.payment_details = payment_details;
        }
        if let Some(shipping_price) = update.shipping_price {
            self.shipping_price = shipping_price;
        }
        if let Some(is_paid) = update.is_paid {
            self.is_paid = is_paid;
        }
        if let Some(shipping) = update.shipping {
            self.shipping = shipping;
        }
        self.updated_at = Utc::now();
    }
}
