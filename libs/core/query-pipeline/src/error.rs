use thiserror::Error;

use crate::validate::Violation;

pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid query: {} violation(s)", .0.len())]
    Invalid(Vec<Violation>),

    #[error("aggregation failed: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("unexpected aggregation result: {0}")]
    Decode(#[from] mongodb::bson::de::Error),
}

impl From<Vec<Violation>> for QueryError {
    fn from(violations: Vec<Violation>) -> Self {
        QueryError::Invalid(violations)
    }
}

impl From<Violation> for QueryError {
    fn from(violation: Violation) -> Self {
        QueryError::Invalid(vec![violation])
    }
}
