//! Compiles a URL query string into a MongoDB aggregation pipeline.
//!
//! ```text
//! ?q=lamp&categories=home,garden&unitPrice[gte]=10&sort=-unitPrice&fields=title&page=2
//!                         │
//!                         ▼
//!   QuerySpec ──validate(QuerySchema)──► ValidatedQuery
//!                                             │
//!                                             ▼
//!   QueryFeatures: search → filter → sort → limit_fields → paginate
//!                                             │
//!                                             ▼
//!   [$search] $match $sort $project $facet{metadata,data} $unwind
//!                                             │
//!                                             ▼
//!   ResultEnvelope { data, metadata { totalResults, currentPage, totalPages, limit } }
//! ```
//!
//! Validation collects every violation before failing, so one bad request
//! reports all of its problems at once. Stages always come out in the same
//! order no matter which steps ran or in which order they were called.
//!
//! With the `axum` feature, [`QuerySpec`] is an extractor and [`QueryError`]
//! converts into `axum_helpers::AppError`.

mod envelope;
mod error;
mod features;
mod schema;
mod stage;
mod validate;
mod value;

#[cfg(feature = "axum")]
mod extract;

pub use envelope::{FacetCount, FacetResult, PaginationMetadata, ResultEnvelope, document_to_json};
pub use error::{QueryError, QueryResult};
pub use features::{QueryFeatures, aggregate_facet};
pub use schema::{
    ComparisonOp, NumericRule, QuerySchema, RESERVED_KEYS, SearchPaths, VERSION_FIELD,
};
pub use stage::PipelineStage;
pub use validate::{
    Condition, FieldFilter, Number, Projection, SortDirection, SortKey, ValidatedQuery, Violation,
};
pub use value::{QuerySpec, QueryValue};
