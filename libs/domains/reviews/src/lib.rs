//! Reviews Domain
//!
//! A review lives in its own collection and is mirrored into the reviewed
//! product, which keeps `reviewCount`, `averageRating` and the most recent
//! reviews embedded.
//!
//! ```text
//! POST /reviews
//!   ├─ insert review
//!   └─ one update-pipeline on the product
//!         reviewCount   += 1
//!         averageRating  = (count·avg + rating) / (count + 1)
//!         reviews        = [summary, ...reviews][..10]
//!      └─ product missing? delete the review, 404
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{ReviewError, ReviewResult};
pub use handlers::ApiDoc;
pub use models::{CreateReview, Review, REVIEWS_COLLECTION};
pub use mongodb::MongoReviewRepository;
pub use repository::ReviewRepository;
pub use service::ReviewService;
