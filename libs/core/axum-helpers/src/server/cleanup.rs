//! Database connection cleanup utilities.
//!
//! Helpers for closing connections during graceful shutdown.

use tracing::info;

/// Cleanup handler for a MongoDB client.
///
/// `Client::shutdown` waits for outstanding operations and closes the pool.
/// Clones of the client held elsewhere must be dropped first, otherwise the
/// call waits for them.
///
/// # Example
/// ```ignore
/// use axum_helpers::server::close_mongo;
///
/// close_mongo(client, "main").await;
/// ```
pub async fn close_mongo(client: mongodb::Client, name: &str) {
    client.shutdown().await;
    info!("MongoDB client '{}' closed successfully", name);
}
