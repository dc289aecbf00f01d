//! Rules for `GET /products/own`.

use core_config::query::QueryConfig;
use query_pipeline::{NumericRule, QuerySchema, SearchPaths};

/// Fields that `sort` silently drops
pub const UNSORTABLE_FIELDS: [&str; 3] = ["_id", "__v", "media"];

/// ```
/// use core_config::query::QueryConfig;
/// use domain_products::query::product_query_schema;
///
/// let schema = product_query_schema(&QueryConfig::default());
/// assert!(schema.is_list_field("categories"));
/// assert!(!schema.is_sortable("media"));
/// assert_eq!(schema.max_limit, 350);
/// ```
pub fn product_query_schema(config: &QueryConfig) -> QuerySchema {
    QuerySchema::new(config.page_limit_default, config.page_limit_max)
        .with_search(SearchPaths::new(
            config.product_search_index.clone(),
            "title",
            "description",
        ))
        .with_list_field("categories")
        .with_numeric_field("unitPrice", NumericRule::natural())
        .with_numeric_field("availableStock", NumericRule::integer())
        .with_unsortable_fields(UNSORTABLE_FIELDS)
        .with_created_at_field("createdAt")
}
