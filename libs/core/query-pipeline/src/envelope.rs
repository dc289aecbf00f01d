//! Paginated result envelope returned to API clients.

use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// Raw output of the `$facet` + `$unwind` tail of a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FacetResult {
    #[serde(default)]
    pub data: Vec<Document>,
    /// Absent when nothing matched
    #[serde(default)]
    pub metadata: Option<FacetCount>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetCount {
    pub total_results: u64,
}

impl FacetResult {
    pub fn total_results(&self) -> u64 {
        self.metadata.map(|m| m.total_results).unwrap_or(0)
    }
}

/// Page bookkeeping attached to every list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_results: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub limit: u64,
}

impl PaginationMetadata {
    pub fn new(total_results: u64, current_page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_results.div_ceil(limit)
        };
        Self {
            total_results,
            current_page,
            total_pages,
            limit,
        }
    }
}

/// `{ data, metadata }` body of a compiled query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResultEnvelope {
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Value>,
    pub metadata: PaginationMetadata,
}

impl ResultEnvelope {
    pub fn from_facet(facet: FacetResult, current_page: u64, limit: u64) -> Self {
        let metadata = PaginationMetadata::new(facet.total_results(), current_page, limit);
        let data = facet.data.into_iter().map(document_to_json).collect();
        Self { data, metadata }
    }
}

/// Convert a stored document to plain JSON. UUIDs and dates are rendered as
/// strings instead of extended JSON wrappers.
pub fn document_to_json(document: Document) -> Value {
    let map: Map<String, Value> = document
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect();
    Value::Object(map)
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Binary(binary) if binary.bytes.len() == 16 => match Uuid::from_slice(&binary.bytes) {
            Ok(uuid) => Value::String(uuid.to_string()),
            Err(_) => Bson::Binary(binary).into_relaxed_extjson(),
        },
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Bson::DateTime(dt).into_relaxed_extjson(),
        },
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Int32(n) => Value::from(n),
        Bson::Int64(n) => Value::from(n),
        other => other.into_relaxed_extjson(),
    }
}
