//! Validation of a decoded [`QuerySpec`] against a [`QuerySchema`].
//!
//! Everything that can be wrong with a query string is caught here, so the
//! compiler downstream only ever sees well-formed, typed input.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use crate::schema::{ComparisonOp, NumericRule, QuerySchema};
use crate::value::{QuerySpec, QueryValue};

/// A single rejected query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    /// Dotted location of the offending value, e.g. `unitPrice.gte`
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A numeric operand, kept integral when the input was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Parse a query-string operand. Rejects empty input, NaN and infinities.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Some(Number::Integer(n));
        }
        raw.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Number::Float)
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Number::Integer(_) => true,
            Number::Float(f) => f.fract() == 0.0,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(n) => *n as f64,
            Number::Float(f) => *f,
        }
    }
}

/// How a single field is matched.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Exact equality with the raw string
    Equals(String),
    /// Array field contains at least one of the values
    AnyOf(Vec<String>),
    /// Numeric comparisons, all of which must hold
    Compare(Vec<(ComparisonOp, Number)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub condition: Condition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Requested field projection. MongoDB forbids mixing the two forms, with
/// the single exception of dropping `_id` from an inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Include { fields: Vec<String>, exclude_id: bool },
    Exclude(Vec<String>),
}

/// A query that passed validation and is ready to compile.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuery {
    pub search: Option<String>,
    pub filters: Vec<FieldFilter>,
    pub sort: Option<Vec<SortKey>>,
    pub projection: Option<Projection>,
    pub page: u64,
    pub limit: u64,
}

impl ValidatedQuery {
    /// An empty query: first page, default limit, no filters.
    pub fn defaults(schema: &QuerySchema) -> Self {
        Self {
            search: None,
            filters: Vec::new(),
            sort: None,
            projection: None,
            page: 1,
            limit: schema.default_limit,
        }
    }

    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl QuerySpec {
    /// Check every parameter against `schema`, collecting all violations
    /// rather than stopping at the first.
    pub fn validate(&self, schema: &QuerySchema) -> Result<ValidatedQuery, Vec<Violation>> {
        let mut violations = Vec::new();
        let mut query = ValidatedQuery::defaults(schema);

        for (key, value) in self.iter() {
            match key.as_str() {
                "q" => query.search = validate_search(value, schema, &mut violations),
                "page" => {
                    if let Some(page) = validate_page(value, &mut violations) {
                        query.page = page;
                    }
                }
                "limit" => {
                    if let Some(limit) = validate_limit(value, schema, &mut violations) {
                        query.limit = limit;
                    }
                }
                "sort" => query.sort = validate_sort(value, schema, &mut violations),
                "fields" => query.projection = validate_fields(value, &mut violations),
                _ => {
                    if let Some(filter) = validate_filter(key, value, schema, &mut violations) {
                        query.filters.push(filter);
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(query)
        } else {
            Err(violations)
        }
    }
}

fn single_text<'a>(
    key: &str,
    value: &'a QueryValue,
    violations: &mut Vec<Violation>,
) -> Option<&'a str> {
    match value {
        QueryValue::Text(text) => Some(text.as_str()),
        other => {
            violations.push(Violation::new(
                key,
                format!("{key} must be a single value, got {}", other.kind()),
            ));
            None
        }
    }
}

fn validate_search(
    value: &QueryValue,
    schema: &QuerySchema,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    let term = single_text("q", value, violations)?.trim();
    if term.is_empty() {
        return None;
    }
    if schema.search.is_none() {
        violations.push(Violation::new("q", "search is not supported here"));
        return None;
    }
    Some(term.to_string())
}

fn validate_page(value: &QueryValue, violations: &mut Vec<Violation>) -> Option<u64> {
    let raw = single_text("page", value, violations)?;
    match raw.trim().parse::<u64>() {
        Ok(page) if page >= 1 => Some(page),
        _ => {
            violations.push(Violation::new("page", "page must be a positive integer"));
            None
        }
    }
}

fn validate_limit(
    value: &QueryValue,
    schema: &QuerySchema,
    violations: &mut Vec<Violation>,
) -> Option<u64> {
    let raw = single_text("limit", value, violations)?;
    match raw.trim().parse::<u64>() {
        Ok(limit) if (1..=schema.max_limit).contains(&limit) => Some(limit),
        _ => {
            violations.push(Violation::new(
                "limit",
                format!("limit must be an integer between 1 and {}", schema.max_limit),
            ));
            None
        }
    }
}

/// Split a comma list into `(name, negated)` pairs, rejecting empty names
/// and operator-looking names.
fn split_field_list(
    key: &str,
    raw: &str,
    violations: &mut Vec<Violation>,
) -> Option<Vec<(String, bool)>> {
    let mut out: Vec<(String, bool)> = Vec::new();
    let mut ok = true;
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, negated) = match part.strip_prefix('-') {
            Some(name) => (name.trim(), true),
            None => (part, false),
        };
        if name.is_empty() || name.starts_with('$') {
            violations.push(Violation::new(key, format!("invalid field name '{part}'")));
            ok = false;
            continue;
        }
        if !out.iter().any(|(existing, _)| existing == name) {
            out.push((name.to_string(), negated));
        }
    }
    ok.then_some(out)
}

fn validate_sort(
    value: &QueryValue,
    schema: &QuerySchema,
    violations: &mut Vec<Violation>,
) -> Option<Vec<SortKey>> {
    let raw = single_text("sort", value, violations)?;
    let keys: Vec<SortKey> = split_field_list("sort", raw, violations)?
        .into_iter()
        .filter(|(name, _)| schema.is_sortable(name))
        .map(|(field, descending)| SortKey {
            field,
            direction: if descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        })
        .collect();

    (!keys.is_empty()).then_some(keys)
}

fn validate_fields(value: &QueryValue, violations: &mut Vec<Violation>) -> Option<Projection> {
    let raw = single_text("fields", value, violations)?;
    let parts = split_field_list("fields", raw, violations)?;
    if parts.is_empty() {
        return None;
    }

    let (excluded, included): (Vec<_>, Vec<_>) = parts.into_iter().partition(|(_, neg)| *neg);
    let included: Vec<String> = included.into_iter().map(|(name, _)| name).collect();
    let excluded: Vec<String> = excluded.into_iter().map(|(name, _)| name).collect();

    if included.is_empty() {
        return Some(Projection::Exclude(excluded));
    }
    if excluded.iter().any(|name| name != "_id") {
        violations.push(Violation::new(
            "fields",
            "cannot mix included and excluded fields (only -_id may be combined with inclusions)",
        ));
        return None;
    }
    Some(Projection::Include {
        fields: included,
        exclude_id: !excluded.is_empty(),
    })
}

fn validate_filter(
    key: &str,
    value: &QueryValue,
    schema: &QuerySchema,
    violations: &mut Vec<Violation>,
) -> Option<FieldFilter> {
    if key.starts_with('$') {
        violations.push(Violation::new(key, "operator keys are not allowed as fields"));
        return None;
    }
    if key
        .split('.')
        .any(|segment| segment.is_empty() || segment.starts_with('$'))
    {
        violations.push(Violation::new(
            key,
            "field path segments must be non-empty and must not start with $",
        ));
        return None;
    }

    let condition = if schema.is_list_field(key) {
        list_condition(key, value, violations)?
    } else if let Some(rule) = schema.numeric_rule(key) {
        match value {
            QueryValue::Nested(ops) => compare_condition(key, ops, Some(rule), violations)?,
            _ => {
                violations.push(Violation::new(
                    key,
                    format!("{key} must be given as a range, e.g. {key}[gte]=0"),
                ));
                return None;
            }
        }
    } else {
        match value {
            QueryValue::Text(text) => Condition::Equals(text.clone()),
            QueryValue::List(items) => Condition::AnyOf(items.clone()),
            QueryValue::Nested(ops) => compare_condition(key, ops, None, violations)?,
        }
    };

    Some(FieldFilter {
        field: key.to_string(),
        condition,
    })
}

/// Comma-separated (or repeated) text values for an array field.
fn list_condition(
    key: &str,
    value: &QueryValue,
    violations: &mut Vec<Violation>,
) -> Option<Condition> {
    let raw: Vec<&str> = match value {
        QueryValue::Text(text) => vec![text.as_str()],
        QueryValue::List(items) => items.iter().map(String::as_str).collect(),
        QueryValue::Nested(_) => {
            violations.push(Violation::new(key, format!("{key} must be text split by comma")));
            return None;
        }
    };

    let values: Vec<String> = raw
        .iter()
        .flat_map(|item| item.split(','))
        .map(|item| item.trim().to_string())
        .collect();

    if values
        .iter()
        .any(|item| item.is_empty() || Number::parse(item).is_some())
    {
        violations.push(Violation::new(key, format!("{key} must be text split by comma")));
        return None;
    }
    Some(Condition::AnyOf(values))
}

fn compare_condition(
    key: &str,
    ops: &std::collections::BTreeMap<String, QueryValue>,
    rule: Option<&NumericRule>,
    violations: &mut Vec<Violation>,
) -> Option<Condition> {
    let before = violations.len();
    let mut comparisons = Vec::with_capacity(ops.len());

    for (op_key, operand) in ops {
        let path = format!("{key}.{op_key}");
        let Some(op) = ComparisonOp::from_key(op_key) else {
            violations.push(Violation::new(
                path,
                format!("unsupported operator '{op_key}', expected one of gte, gt, lte, lt"),
            ));
            continue;
        };
        let QueryValue::Text(raw) = operand else {
            violations.push(Violation::new(path, "operator value must be a single number"));
            continue;
        };
        let Some(number) = Number::parse(raw) else {
            violations.push(Violation::new(path, format!("{key} must be a number")));
            continue;
        };
        if let Some(rule) = rule {
            if let Some(message) = rule_violation(key, rule, &number) {
                violations.push(Violation::new(path, message));
                continue;
            }
        }
        comparisons.push((op, number));
    }

    (violations.len() == before).then_some(Condition::Compare(comparisons))
}

fn rule_violation(key: &str, rule: &NumericRule, number: &Number) -> Option<String> {
    let below_min = rule.min.is_some_and(|min| number.as_f64() < min as f64);
    match (rule.integer, rule.min) {
        (true, Some(0)) if below_min || !number.is_integer() => {
            Some(format!("{key} must be a natural number"))
        }
        (true, _) if !number.is_integer() => Some(format!("{key} must be an integer")),
        (_, Some(min)) if below_min => Some(format!("{key} must be at least {min}")),
        _ => None,
    }
}
