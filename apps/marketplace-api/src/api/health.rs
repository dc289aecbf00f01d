//! Readiness endpoint

use axum::{extract::State, routing::get, Json, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture};
use mongodb::Database;
use serde_json::Value;

async fn readiness_check(
    State(db): State<Database>,
) -> Result<(axum::http::StatusCode, Json<Value>), (axum::http::StatusCode, Json<Value>)> {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "mongodb",
        Box::pin(async {
            database::mongodb::check_health(&db)
                .await
                .map_err(|e| e.to_string())
        }),
    )];
    run_health_checks(checks).await
}

/// `/ready` reports 503 until MongoDB answers a ping
pub fn router(db: Database) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(db)
}
