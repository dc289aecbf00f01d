//! Orders API routes

use axum::Router;
use domain_orders::{handlers, MongoOrderRepository, OrderService};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoOrderRepository::new(&state.db);
    handlers::router(OrderService::new(repository))
}

pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoOrderRepository::new(&state.db).init_indexes().await?;
    Ok(())
}
