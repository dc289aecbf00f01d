//! Review Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{CreateReview, Review};
use crate::repository::ReviewRepository;

pub struct ReviewService<R: ReviewRepository> {
    repository: Arc<R>,
}

impl<R: ReviewRepository> ReviewService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Store the review, then fold it into its product.
    ///
    /// The review is removed again when the product is missing or the
    /// product update fails.
    #[instrument(skip(self, input), fields(product_id = %input.product, user_id = %input.user_id))]
    pub async fn create_review(&self, input: CreateReview) -> ReviewResult<Review> {
        input
            .validate()
            .map_err(|e| ReviewError::Validation(e.to_string()))?;

        let product_id = input.product;
        let review = self.repository.insert(Review::new(input)).await?;

        match self
            .repository
            .attach_to_product(product_id, review.summary())
            .await
        {
            Ok(true) => Ok(review),
            Ok(false) => {
                self.discard(review.id).await;
                Err(ReviewError::ProductNotFound(product_id))
            }
            Err(e) => {
                self.discard(review.id).await;
                Err(e)
            }
        }
    }

    async fn discard(&self, id: Uuid) {
        if let Err(e) = self.repository.delete(id).await {
            tracing::error!(review_id = %id, error = %e, "Failed to remove orphaned review");
        }
    }

    #[instrument(skip(self))]
    pub async fn get_review(&self, id: Uuid) -> ReviewResult<Review> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ReviewError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_product_reviews(&self, product_id: Uuid) -> ReviewResult<Vec<Review>> {
        self.repository.list_by_product(product_id).await
    }
}
