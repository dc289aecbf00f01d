//! Per-collection rules that a query string is validated against.

use std::collections::BTreeMap;

/// Control keys that steer the pipeline and are never treated as filters.
pub const RESERVED_KEYS: [&str; 5] = ["page", "sort", "limit", "fields", "q"];

/// Field holding the document version counter, hidden by default.
pub const VERSION_FIELD: &str = "__v";

/// Comparison operators accepted in bracket notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComparisonOp {
    Gte,
    Gt,
    Lte,
    Lt,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 4] = [
        ComparisonOp::Gte,
        ComparisonOp::Gt,
        ComparisonOp::Lte,
        ComparisonOp::Lt,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "gte" => Some(ComparisonOp::Gte),
            "gt" => Some(ComparisonOp::Gt),
            "lte" => Some(ComparisonOp::Lte),
            "lt" => Some(ComparisonOp::Lt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Gte => "gte",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Lte => "lte",
            ComparisonOp::Lt => "lt",
        }
    }

    /// The MongoDB query operator (`$gte`, ...).
    pub fn mongo_operator(&self) -> &'static str {
        match self {
            ComparisonOp::Gte => "$gte",
            ComparisonOp::Gt => "$gt",
            ComparisonOp::Lte => "$lte",
            ComparisonOp::Lt => "$lt",
        }
    }
}

/// Constraints for a numeric field filtered with operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumericRule {
    /// Reject fractional operands
    pub integer: bool,
    /// Smallest accepted operand
    pub min: Option<i64>,
}

impl NumericRule {
    pub fn integer() -> Self {
        Self {
            integer: true,
            min: None,
        }
    }

    pub fn natural() -> Self {
        Self {
            integer: true,
            min: Some(0),
        }
    }
}

/// Atlas Search configuration for the `q` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths {
    pub index: String,
    pub primary: String,
    pub secondary: String,
    pub primary_boost: i32,
}

impl SearchPaths {
    pub fn new(
        index: impl Into<String>,
        primary: impl Into<String>,
        secondary: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            primary: primary.into(),
            secondary: secondary.into(),
            primary_boost: 3,
        }
    }
}

/// Validation and compilation rules for one collection.
///
/// ```
/// use query_pipeline::{NumericRule, QuerySchema, SearchPaths};
///
/// let schema = QuerySchema::new(20, 350)
///     .with_search(SearchPaths::new("product-search", "title", "description"))
///     .with_list_field("categories")
///     .with_numeric_field("unitPrice", NumericRule::natural())
///     .with_unsortable_fields(["_id", "__v", "media"]);
///
/// assert!(schema.is_list_field("categories"));
/// assert_eq!(schema.default_limit, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySchema {
    pub search: Option<SearchPaths>,
    pub list_fields: Vec<String>,
    pub numeric_fields: BTreeMap<String, NumericRule>,
    pub unsortable_fields: Vec<String>,
    /// Field used for the implicit newest-first ordering
    pub created_at_field: String,
    pub default_limit: u64,
    pub max_limit: u64,
}

impl QuerySchema {
    pub fn new(default_limit: u64, max_limit: u64) -> Self {
        Self {
            search: None,
            list_fields: Vec::new(),
            numeric_fields: BTreeMap::new(),
            unsortable_fields: Vec::new(),
            created_at_field: "createdAt".to_string(),
            default_limit,
            max_limit,
        }
    }

    pub fn with_search(mut self, search: SearchPaths) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_list_field(mut self, field: impl Into<String>) -> Self {
        self.list_fields.push(field.into());
        self
    }

    pub fn with_numeric_field(mut self, field: impl Into<String>, rule: NumericRule) -> Self {
        self.numeric_fields.insert(field.into(), rule);
        self
    }

    pub fn with_unsortable_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unsortable_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_created_at_field(mut self, field: impl Into<String>) -> Self {
        self.created_at_field = field.into();
        self
    }

    pub fn is_list_field(&self, field: &str) -> bool {
        self.list_fields.iter().any(|f| f == field)
    }

    pub fn numeric_rule(&self, field: &str) -> Option<&NumericRule> {
        self.numeric_fields.get(field)
    }

    pub fn is_sortable(&self, field: &str) -> bool {
        !self.unsortable_fields.iter().any(|f| f == field)
    }

    pub fn is_reserved(key: &str) -> bool {
        RESERVED_KEYS.contains(&key)
    }
}
