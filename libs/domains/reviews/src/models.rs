use chrono::{DateTime, Utc};
use database::mongodb::serde_helpers::{timestamp, uuid_as_string};
use domain_products::ReviewSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const REVIEWS_COLLECTION: &str = "reviews";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", alias = "id", with = "uuid_as_string")]
    pub id: Uuid,
    pub review: String,
    /// 1 to 5
    pub rating: i32,
    #[serde(default)]
    pub up_vote: i64,
    #[serde(default)]
    pub down_vote: i64,
    #[serde(with = "uuid_as_string")]
    pub user_id: Uuid,
    /// Reviewed product id
    #[serde(with = "uuid_as_string")]
    pub product: Uuid,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    #[validate(length(min = 1, max = 5000, message = "Review text cannot be empty."))]
    pub review: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5."))]
    pub rating: i32,
    pub user_id: Uuid,
    pub product: Uuid,
}

impl Review {
    pub fn new(input: CreateReview) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            review: input.review.trim().to_string(),
            rating: input.rating,
            up_vote: 0,
            down_vote: 0,
            user_id: input.user_id,
            product: input.product,
            created_at: now,
            updated_at: now,
        }
    }

    /// The copy embedded in the product document
    pub fn summary(&self) -> ReviewSummary {
        ReviewSummary {
            id: self.id,
            review: self.review.clone(),
            rating: self.rating,
            up_vote: self.up_vote,
            down_vote: self.down_vote,
            user_id: self.user_id,
        }
    }
}
