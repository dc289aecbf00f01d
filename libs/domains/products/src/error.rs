use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use query_pipeline::QueryError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// `GET /products` on an empty collection
    #[error("There is no document found")]
    Empty,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Product {0} was modified concurrently")]
    VersionConflict(Uuid),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Invalid stored document: {0}")]
    Decode(#[from] mongodb::bson::de::Error),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Empty => AppError::NotFound("There is no document found".to_string()),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::VersionConflict(id) => AppError::Conflict(format!(
                "Product {} was modified by another request, retry the update",
                id
            )),
            ProductError::Query(e) => e.into(),
            // Duplicate slugs surface as 409 through the mongo error mapping
            ProductError::Database(e) => AppError::Database(e),
            ProductError::Decode(e) => AppError::BsonDeserialization(e),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
