use chrono::{DateTime, Utc};
use database::mongodb::serde_helpers::{option_uuid_as_string, timestamp, uuid_as_string};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateUrl, ValidationError};

pub const PRODUCTS_COLLECTION: &str = "products";

/// Most recent reviews embedded in each product document
pub const MAX_EMBEDDED_REVIEWS: i32 = 10;

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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductUnit {
    #[default]
    Item,
    Kg,
    Pot,
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductStatus {
    /// Listed in search results
    #[default]
    Public,
    Hidden,
}

/// Review as embedded in a product, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    #[serde(rename = "_id", alias = "id", with = "uuid_as_string")]
    pub id: Uuid,
    pub review: String,
    pub rating: i32,
    #[serde(default)]
    pub up_vote: i64,
    #[serde(default)]
    pub down_vote: i64,
    #[serde(with = "uuid_as_string")]
    pub user_id: Uuid,
}

/// Product document stored in the `products` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id", with = "uuid_as_string")]
    pub id: Uuid,
    pub title: String,
    /// Unique, regenerated whenever the title changes
    pub slug: String,
    pub description: String,
    /// Smallest currency unit
    pub unit_price: i64,
    #[serde(default)]
    pub unit: ProductUnit,
    pub available_stock: i64,
    #[serde(default)]
    pub sold_amount: i64,
    pub media: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub dimension: Option<serde_json::Value>,
    #[serde(default, with = "option_uuid_as_string")]
    pub seller_id: Option<Uuid>,
    #[serde(default)]
    pub reviews: Vec<ReviewSummary>,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    /// Bumped on every update
    #[serde(rename = "__v", default)]
    pub version: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 3, max = 200, message = "Product title must have at least 3 characters."))]
    pub title: String,
    #[validate(length(
        min = 10,
        message = "Description field cannot be empty and must have at least 10 characters long."
    ))]
    pub description: String,
    #[validate(range(min = 0, message = "The product price must be a positive number."))]
    pub unit_price: i64,
    #[serde(default)]
    pub unit: ProductUnit,
    #[validate(range(min = 0, message = "Please enter the available stock."))]
    pub available_stock: i64,
    #[validate(
        length(min = 1, message = "Please upload images!"),
        custom(function = "validate_media")
    )]
    pub media: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[schema(value_type = Option<Object>)]
    pub dimension: Option<serde_json::Value>,
    pub seller_id: Option<Uuid>,
    #[serde(default)]
    pub status: ProductStatus,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 10))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub unit_price: Option<i64>,
    pub unit: Option<ProductUnit>,
    #[validate(range(min = 0))]
    pub available_stock: Option<i64>,
    #[validate(length(min = 1), custom(function = "validate_media"))]
    pub media: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    #[schema(value_type = Option<Object>)]
    pub dimension: Option<serde_json::Value>,
    pub status: Option<ProductStatus>,
}

fn validate_media(media: &[String]) -> Result<(), ValidationError> {
    if media.iter().all(|url| url.validate_url()) {
        Ok(())
    } else {
        Err(ValidationError::new("url").with_message("Every media entry must be a URL.".into()))
    }
}

/// Lowercase ASCII slug in the style of `slugify(text, { lower, strict })`:
/// alphanumerics are kept, runs of whitespace and dashes become one dash and
/// everything else is dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        }
    }

    slug
}

/// `slugify(title + "-" + epoch millis)`, unique per title and instant
pub fn product_slug(title: &str, at: DateTime<Utc>) -> String {
    slugify(&format!("{}-{}", title, at.timestamp_millis()))
}

impl Product {
    pub fn new(input: CreateProduct) -> Self {
        Self::new_at(input, Utc::now())
    }

    pub fn new_at(input: CreateProduct, now: DateTime<Utc>) -> Self {
        let title = input.title.trim().to_string();
        Self {
            id: Uuid::now_v7(),
            slug: product_slug(&title, now),
            title,
            description: input.description.trim().to_string(),
            unit_price: input.unit_price,
            unit: input.unit,
            available_stock: input.available_stock,
            sold_amount: 0,
            media: input.media,
            categories: input.categories,
            dimension: input.dimension,
            seller_id: input.seller_id,
            reviews: Vec::new(),
            review_count: 0,
            average_rating: 0.0,
            status: input.status,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Apply a partial update, bumping `__v` and `updatedAt`.
    pub fn apply_update(&mut self, update: UpdateProduct, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title != self.title {
                self.slug = product_slug(&title, now);
                self.title = title;
            }
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(unit_price) = update.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        if let Some(available_stock) = update.available_stock {
            self.available_stock = available_stock;
        }
        if let Some(media) = update.media {
            self.media = media;
        }
        if let Some(categories) = update.categories {
            self.categories = categories;
        }
        if let Some(dimension) = update.dimension {
            self.dimension = Some(dimension);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = now;
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input() -> CreateProduct {
        CreateProduct {
            title: "  Terracotta Pot ".to_string(),
            description: "Hand-thrown pot for herbs".to_string(),
            unit_price: 1500,
            unit: ProductUnit::Pot,
            available_stock: 12,
            media: vec!["https://cdn.example.com/pot.jpg".to_string()],
            categories: vec!["garden".to_string()],
            dimension: None,
            seller_id: None,
            status: ProductStatus::Public,
        }
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_slugify_strict_lowercase() {
        assert_eq!(slugify("Terracotta Pot - 1700000000000"), "terracotta-pot-1700000000000");
        assert_eq!(slugify("  Café & Crème!! "), "caf-crme");
        assert_eq!(slugify("a  --  b"), "a-b");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_new_product_defaults() {
        let product = Product::new_at(input(), at(1_700_000_000_000));
        assert_eq!(product.title, "Terracotta Pot");
        assert_eq!(product.slug, "terracotta-pot-1700000000000");
        assert_eq!(product.sold_amount, 0);
        assert_eq!(product.review_count, 0);
        assert_eq!(product.version, 0);
        assert_eq!(product.created_at, product.updated_at);
    }

    #[test]
    fn test_update_bumps_version_and_regenerates_slug_on_title_change() {
        let mut product = Product::new_at(input(), at(1_000));
        product.apply_update(
            UpdateProduct {
                title: Some("Glazed Pot".to_string()),
                unit_price: Some(1800),
                ..Default::default()
            },
            at(2_000),
        );
        assert_eq!(product.slug, "glazed-pot-2000");
        assert_eq!(product.unit_price, 1800);
        assert_eq!(product.version, 1);
        assert_eq!(product.updated_at, at(2_000));
    }

    #[test]
    fn test_update_keeps_slug_when_title_unchanged() {
        let mut product = Product::new_at(input(), at(1_000));
        let slug = product.slug.clone();
        product.apply_update(
            UpdateProduct {
                title: Some("Terracotta Pot".to_string()),
                ..Default::default()
            },
            at(2_000),
        );
        assert_eq!(product.slug, slug);
        assert_eq!(product.version, 1);
    }

    #[test]
    fn test_create_validation() {
        assert!(input().validate().is_ok());

        let mut bad = input();
        bad.title = "ab".to_string();
        bad.description = "short".to_string();
        bad.unit_price = -1;
        bad.media = vec!["not a url".to_string()];
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["title", "description", "unit_price", "media"] {
            assert!(fields.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_empty_media_is_rejected() {
        let mut bad = input();
        bad.media.clear();
        assert!(bad.validate().unwrap_err().field_errors().contains_key("media"));
    }

    #[test]
    fn test_document_field_names() {
        let product = Product::new_at(input(), at(1_000));
        let document = mongodb::bson::to_document(&product).unwrap();
        for key in ["_id", "unitPrice", "availableStock", "createdAt", "__v", "sellerId"] {
            assert!(document.contains_key(key), "missing {key}");
        }
        assert_eq!(document.get_str("unit").unwrap(), "pot");
        assert!(!document.contains_key("dimension"));
    }
}
