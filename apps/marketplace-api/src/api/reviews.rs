//! Reviews API routes

use axum::Router;
use domain_reviews::{handlers, MongoReviewRepository, ReviewService};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoReviewRepository::new(&state.db);
    handlers::router(ReviewService::new(repository))
}

pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoReviewRepository::new(&state.db).init_indexes().await?;
    Ok(())
}
