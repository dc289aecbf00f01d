use async_trait::async_trait;
use domain_products::ReviewSummary;
use uuid::Uuid;

use crate::error::ReviewResult;
use crate::models::Review;

/// Reviews plus the aggregate they keep on their product
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert(&self, review: Review) -> ReviewResult<Review>;

    async fn get_by_id(&self, id: Uuid) -> ReviewResult<Option<Review>>;

    /// Reviews of one product, newest first
    async fn list_by_product(&self, product_id: Uuid) -> ReviewResult<Vec<Review>>;

    async fn delete(&self, id: Uuid) -> ReviewResult<bool>;

    /// Fold a new rating into the product's `reviewCount` and `averageRating`
    /// and prepend the summary to its embedded reviews.
    /// Returns false when the product does not exist.
    async fn attach_to_product(
        &self,
        product_id: Uuid,
        summary: ReviewSummary,
    ) -> ReviewResult<bool>;
}
