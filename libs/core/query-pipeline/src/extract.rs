use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum_helpers::AppError;
use serde_json::json;

use crate::error::QueryError;
use crate::value::QuerySpec;

/// Decodes the raw query string. Schema validation happens later, against
/// the collection the handler queries.
impl<S> FromRequestParts<S> for QuerySpec
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)?;
        QuerySpec::from_pairs(pairs).map_err(|violation| QueryError::from(violation).into())
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Invalid(violations) => AppError::ValidationDetails {
                message: "Invalid query parameters".to_string(),
                details: json!(violations),
            },
            QueryError::Database(e) => AppError::Database(e),
            QueryError::Decode(e) => AppError::BsonDeserialization(e),
        }
    }
}
