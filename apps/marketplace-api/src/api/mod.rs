//! API routes module
//!
//! Nested under /api by axum_helpers::create_router

pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .nest("/orders", orders::router(state))
        .nest("/reviews", reviews::router(state))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    products::init_indexes(state).await?;
    orders::init_indexes(state).await?;
    reviews::init_indexes(state).await
}
