//! Products API routes

use axum::Router;
use domain_products::{handlers, query::product_query_schema, MongoProductRepository, ProductService};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let repository = MongoProductRepository::new(&state.db);
    let schema = product_query_schema(&state.config.query);
    handlers::router(ProductService::new(repository, schema))
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoProductRepository::new(&state.db).init_indexes().await?;
    Ok(())
}
