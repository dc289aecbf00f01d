//! MongoDB implementation of ReviewRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::mongodb::serde_helpers::{timestamp_to_bson, uuid_to_bson};
use domain_products::{ReviewSummary, MAX_EMBEDDED_REVIEWS, PRODUCTS_COLLECTION};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::ReviewResult;
use crate::models::{Review, REVIEWS_COLLECTION};
use crate::repository::ReviewRepository;

pub struct MongoReviewRepository {
    reviews: Collection<Review>,
    products: Collection<Document>,
}

impl MongoReviewRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            reviews: db.collection::<Review>(REVIEWS_COLLECTION),
            products: db.collection::<Document>(PRODUCTS_COLLECTION),
        }
    }

    pub async fn init_indexes(&self) -> ReviewResult<()> {
        let indexes = vec![IndexModel::builder()
            .keys(doc! { "product": 1, "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("idx_product_created".to_string())
                    .build(),
            )
            .build()];

        self.reviews.create_indexes(indexes).await?;
        tracing::info!("Review indexes created successfully");
        Ok(())
    }
}

fn summary_document(summary: &ReviewSummary) -> Document {
    doc! {
        "_id": uuid_to_bson(&summary.id),
        "review": summary.review.clone(),
        "rating": summary.rating,
        "upVote": summary.up_vote,
        "downVote": summary.down_vote,
        "userId": uuid_to_bson(&summary.user_id),
    }
}

/// Single `$set` stage updating the product's review aggregate.
///
/// Every expression reads the document as it was before the stage, so the
/// new average is `(count * avg + rating) / (count + 1)` over the old values.
///
/// `__v` is bumped as well so pending product edits see a version conflict.
pub(crate) fn rating_update_pipeline(summary: &ReviewSummary, now: DateTime<Utc>) -> Vec<Document> {
    let count = doc! { "$ifNull": ["$reviewCount", 0] };
    let average = doc! { "$ifNull": ["$averageRating", 0.0] };

    vec![doc! {
        "$set": {
            "reviewCount": { "$add": [count.clone(), 1] },
            "averageRating": {
                "$divide": [
                    { "$add": [{ "$multiply": [count.clone(), average] }, summary.rating] },
                    { "$add": [count, 1] },
                ]
            },
            "reviews": {
                "$slice": [
                    {
                        "$concatArrays": [
                            [{ "$literal": summary_document(summary) }],
                            { "$ifNull": ["$reviews", []] },
                        ]
                    },
                    MAX_EMBEDDED_REVIEWS,
                ]
            },
            "updatedAt": timestamp_to_bson(&now),
            "__v": { "$add": [{ "$ifNull": ["$__v", 0_i64] }, 1_i64] },
        }
    }]
}

#[async_trait]
impl ReviewRepository for MongoReviewRepository {
    #[instrument(skip(self, review), fields(review_id = %review.id, product_id = %review.product))]
    async fn insert(&self, review: Review) -> ReviewResult<Review> {
        self.reviews.insert_one(&review).await?;

        tracing::info!(review_id = %review.id, rating = review.rating, "Review created successfully");
        Ok(review)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        let review = self
            .reviews
            .find_one(doc! { "_id": uuid_to_bson(&id) })
            .await?;
        Ok(review)
    }

    #[instrument(skip(self))]
    async fn list_by_product(&self, product_id: Uuid) -> ReviewResult<Vec<Review>> {
        let cursor = self
            .reviews
            .find(doc! { "product": uuid_to_bson(&product_id) })
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?;
        let reviews: Vec<Review> = cursor.try_collect().await?;
        Ok(reviews)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ReviewResult<bool> {
        let result = self
            .reviews
            .delete_one(doc! { "_id": uuid_to_bson(&id) })
            .await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self, summary), fields(review_id = %summary.id))]
    async fn attach_to_product(
        &self,
        product_id: Uuid,
        summary: ReviewSummary,
    ) -> ReviewResult<bool> {
        let pipeline = rating_update_pipeline(&summary, Utc::now());
        let result = self
            .products
            .update_one(doc! { "_id": uuid_to_bson(&product_id) }, pipeline)
            .await?;

        if result.matched_count == 0 {
            tracing::warn!(product_id = %product_id, "Review target product not found");
            return Ok(false);
        }

        tracing::info!(product_id = %product_id, rating = summary.rating, "Product rating updated");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(rating: i32) -> ReviewSummary {
        ReviewSummary {
            id: Uuid::now_v7(),
            review: "$5 well spent".to_string(),
            rating,
            up_vote: 0,
            down_vote: 0,
            user_id: Uuid::now_v7(),
        }
    }

    #[test]
    fn test_pipeline_is_single_set_stage() {
        let pipeline = rating_update_pipeline(&summary(4), Utc::now());
        assert_eq!(pipeline.len(), 1);
        let set = pipeline[0].get_document("$set").unwrap();
        let keys: Vec<&str> = set.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["reviewCount", "averageRating", "reviews", "updatedAt", "__v"]
        );
    }

    #[test]
    fn test_pipeline_bumps_product_version() {
        let pipeline = rating_update_pipeline(&summary(3), Utc::now());
        let set = pipeline[0].get_document("$set").unwrap();
        assert_eq!(
            set.get_document("__v").unwrap(),
            &doc! { "$add": [{ "$ifNull": ["$__v", 0_i64] }, 1_i64] }
        );
    }

    #[test]
    fn test_pipeline_caps_embedded_reviews() {
        let pipeline = rating_update_pipeline(&summary(4), Utc::now());
        let set = pipeline[0].get_document("$set").unwrap();
        let slice = set
            .get_document("reviews")
            .unwrap()
            .get_array("$slice")
            .unwrap();
        assert_eq!(slice[1].as_i32(), Some(MAX_EMBEDDED_REVIEWS));
    }

    #[test]
    fn test_summary_is_wrapped_in_literal() {
        let s = summary(2);
        let pipeline = rating_update_pipeline(&s, Utc::now());
        let set = pipeline[0].get_document("$set").unwrap();
        let concat = set
            .get_document("reviews")
            .unwrap()
            .get_array("$slice")
            .unwrap()[0]
            .as_document()
            .unwrap()
            .get_array("$concatArrays")
            .unwrap();
        let head = concat[0].as_array().unwrap()[0].as_document().unwrap();
        let literal = head.get_document("$literal").unwrap();
        assert_eq!(literal.get_str("_id").unwrap(), s.id.to_string());
        assert_eq!(literal.get_str("review").unwrap(), "$5 well spent");
        assert_eq!(literal.get_i32("rating").unwrap(), 2);
    }

    #[test]
    fn test_average_uses_rating_operand() {
        let pipeline = rating_update_pipeline(&summary(5), Utc::now());
        let set = pipeline[0].get_document("$set").unwrap();
        let divide = set
            .get_document("averageRating")
            .unwrap()
            .get_array("$divide")
            .unwrap();
        let numerator = divide[0].as_document().unwrap().get_array("$add").unwrap();
        assert_eq!(numerator[1].as_i32(), Some(5));
    }
}
