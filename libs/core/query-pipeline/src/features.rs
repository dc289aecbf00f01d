//! The query compiler: an accumulator that turns a [`ValidatedQuery`] into
//! aggregation stages, one step at a time.

use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::Collection;
use tracing::instrument;

use crate::envelope::{FacetResult, ResultEnvelope};
use crate::error::QueryResult;
use crate::schema::{QuerySchema, VERSION_FIELD};
use crate::stage::PipelineStage;
use crate::validate::{Condition, Number, Projection, SortDirection, ValidatedQuery};
use crate::value::QuerySpec;

/// Immutable pipeline builder. Each step consumes the builder and returns it
/// with at most one more stage appended.
///
/// ```
/// use query_pipeline::{QueryFeatures, QuerySchema, QuerySpec};
///
/// let schema = QuerySchema::new(20, 350);
/// let spec = QuerySpec::from_pairs([("status", "public"), ("page", "2")]).unwrap();
/// let query = spec.validate(&schema).unwrap();
///
/// let stages: Vec<&str> = QueryFeatures::new(&schema, query)
///     .compile()
///     .stages()
///     .iter()
///     .map(|s| s.name())
///     .collect();
/// assert_eq!(stages, ["$match", "$sort", "$project", "$facet", "$unwind"]);
/// ```
#[derive(Debug, Clone)]
pub struct QueryFeatures<'a> {
    schema: &'a QuerySchema,
    query: ValidatedQuery,
    stages: Vec<PipelineStage>,
}

impl<'a> QueryFeatures<'a> {
    pub fn new(schema: &'a QuerySchema, query: ValidatedQuery) -> Self {
        Self {
            schema,
            query,
            stages: Vec::new(),
        }
    }

    /// Validate `spec` and start a builder for it.
    pub fn from_spec(schema: &'a QuerySchema, spec: &QuerySpec) -> QueryResult<Self> {
        let query = spec.validate(schema)?;
        Ok(Self::new(schema, query))
    }

    fn push(mut self, stage: PipelineStage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Relevance search over the configured Atlas Search index.
    pub fn search(self) -> Self {
        let (Some(term), Some(paths)) = (self.query.search.as_deref(), self.schema.search.as_ref())
        else {
            return self;
        };

        let body = doc! {
            "index": paths.index.as_str(),
            "compound": {
                "should": [
                    {
                        "text": {
                            "query": term,
                            "path": paths.primary.as_str(),
                            "score": { "boost": { "value": paths.primary_boost } },
                            "fuzzy": {},
                        }
                    },
                    {
                        "text": {
                            "query": term,
                            "path": paths.secondary.as_str(),
                            "fuzzy": {},
                        }
                    },
                ]
            }
        };
        self.push(PipelineStage::Search(body))
    }

    /// Always emits a `$match`, empty when there are no filters.
    pub fn filter(self) -> Self {
        let mut body = Document::new();
        for filter in &self.query.filters {
            let condition = match &filter.condition {
                Condition::Equals(value) => Bson::String(value.clone()),
                Condition::AnyOf(values) => {
                    Bson::Document(doc! { "$elemMatch": { "$in": values.clone() } })
                }
                Condition::Compare(comparisons) => {
                    let mut ops = Document::new();
                    for (op, operand) in comparisons {
                        ops.insert(op.mongo_operator(), number_to_bson(operand));
                    }
                    Bson::Document(ops)
                }
            };
            body.insert(filter.field.clone(), condition);
        }
        self.push(PipelineStage::Match(body))
    }

    /// Explicit sort keys in listed order; otherwise newest first, unless a
    /// search is active, in which case relevance order is kept.
    ///
    /// `_id` is appended as the final key so equal values still page in a
    /// total order. It follows the direction of the last listed key.
    pub fn sort(self) -> Self {
        if self.query.sort.is_none() && self.query.search.is_some() {
            return self;
        }
        let mut body = Document::new();
        let mut last = SortDirection::Descending;
        match &self.query.sort {
            Some(keys) => {
                for key in keys {
                    body.insert(key.field.clone(), key.direction.as_i32());
                    last = key.direction;
                }
            }
            None => {
                body.insert(self.schema.created_at_field.clone(), last.as_i32());
            }
        }
        if !body.contains_key("_id") {
            body.insert("_id", last.as_i32());
        }
        self.push(PipelineStage::Sort(body))
    }

    pub fn limit_fields(self) -> Self {
        let mut body = Document::new();
        match &self.query.projection {
            Some(Projection::Include { fields, exclude_id }) => {
                for field in fields {
                    body.insert(field.clone(), 1);
                }
                if *exclude_id {
                    body.insert("_id", 0);
                }
            }
            Some(Projection::Exclude(fields)) => {
                for field in fields {
                    body.insert(field.clone(), 0);
                }
            }
            None => {
                body.insert(VERSION_FIELD, 0);
            }
        }
        self.push(PipelineStage::Project(body))
    }

    pub fn paginate(self) -> Self {
        let skip = self.query.skip();
        let limit = self.query.limit;
        self.push(PipelineStage::Facet { skip, limit })
            .push(PipelineStage::Unwind {
                path: "$metadata".to_string(),
                preserve_empty: true,
            })
    }

    /// Run every step in order.
    pub fn compile(self) -> Self {
        self.search().filter().sort().limit_fields().paginate()
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    pub fn query(&self) -> &ValidatedQuery {
        &self.query
    }

    /// Render the accumulated stages in their fixed order, regardless of the
    /// order the steps were called in.
    pub fn pipeline(&self) -> Vec<Document> {
        let mut stages: Vec<&PipelineStage> = self.stages.iter().collect();
        stages.sort_by_key(|stage| stage.rank());
        stages.into_iter().map(PipelineStage::to_document).collect()
    }

    /// Run the pipeline and return the raw facet branches.
    #[instrument(skip(self, collection), fields(collection = %collection.name(), stages = self.stages.len()))]
    pub async fn execute(&self, collection: &Collection<Document>) -> QueryResult<FacetResult> {
        aggregate_facet(collection, self.pipeline()).await
    }

    /// Compile, execute and wrap the result with pagination metadata.
    pub async fn fetch(self, collection: &Collection<Document>) -> QueryResult<ResultEnvelope> {
        let compiled = self.compile();
        let facet = compiled.execute(collection).await?;
        Ok(ResultEnvelope::from_facet(
            facet,
            compiled.query.page,
            compiled.query.limit,
        ))
    }
}

/// Run an already rendered `$facet` pipeline and decode its single output
/// document. An empty cursor yields an empty result.
pub async fn aggregate_facet<T>(
    collection: &Collection<T>,
    pipeline: Vec<Document>,
) -> QueryResult<FacetResult>
where
    T: Send + Sync,
{
    let mut cursor = collection.aggregate(pipeline).await?;
    let facet = match cursor.try_next().await? {
        Some(document) => mongodb::bson::from_document(document)?,
        None => FacetResult::default(),
    };
    tracing::debug!(total_results = facet.total_results(), "Aggregation finished");
    Ok(facet)
}

fn number_to_bson(number: &Number) -> Bson {
    match number {
        Number::Integer(n) => Bson::Int64(*n),
        Number::Float(f) => Bson::Double(*f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NumericRule, SearchPaths};

    fn schema() -> QuerySchema {
        QuerySchema::new(20, 350)
            .with_search(SearchPaths::new("product-search", "title", "description"))
            .with_list_field("categories")
            .with_numeric_field("unitPrice", NumericRule::natural())
            .with_numeric_field("availableStock", NumericRule::integer())
            .with_unsortable_fields(["_id", "__v", "media"])
    }

    fn compile(schema: &QuerySchema, pairs: &[(&str, &str)]) -> Vec<Document> {
        let spec = QuerySpec::from_pairs(pairs.iter().copied()).unwrap();
        QueryFeatures::from_spec(schema, &spec)
            .unwrap()
            .compile()
            .pipeline()
    }

    fn stage<'d>(pipeline: &'d [Document], name: &str) -> Option<&'d Document> {
        pipeline
            .iter()
            .find_map(|stage| stage.get_document(name).ok())
    }

    fn names(pipeline: &[Document]) -> Vec<String> {
        pipeline
            .iter()
            .filter_map(|stage| stage.keys().next().cloned())
            .collect()
    }

    #[test]
    fn test_empty_query_compiles_defaults() {
        let schema = schema();
        let pipeline = compile(&schema, &[]);
        assert_eq!(
            pipeline,
            vec![
                doc! { "$match": {} },
                doc! { "$sort": { "createdAt": -1, "_id": -1 } },
                doc! { "$project": { "__v": 0 } },
                doc! {
                    "$facet": {
                        "metadata": [{ "$count": "totalResults" }],
                        "data": [{ "$skip": 0_i64 }, { "$limit": 20_i64 }],
                    }
                },
                doc! { "$unwind": { "path": "$metadata", "preserveNullAndEmptyArrays": true } },
            ]
        );
    }

    #[test]
    fn test_search_emits_boosted_compound_first() {
        let schema = schema();
        let pipeline = compile(&schema, &[("q", "tomato"), ("status", "public")]);
        assert_eq!(
            names(&pipeline),
            ["$search", "$match", "$project", "$facet", "$unwind"]
        );
        assert_eq!(
            pipeline[0],
            doc! {
                "$search": {
                    "index": "product-search",
                    "compound": {
                        "should": [
                            {
                                "text": {
                                    "query": "tomato",
                                    "path": "title",
                                    "score": { "boost": { "value": 3 } },
                                    "fuzzy": {},
                                }
                            },
                            {
                                "text": {
                                    "query": "tomato",
                                    "path": "description",
                                    "fuzzy": {},
                                }
                            },
                        ]
                    }
                }
            }
        );
    }

    #[test]
    fn test_explicit_sort_applies_with_search() {
        let schema = schema();
        let pipeline = compile(&schema, &[("q", "tomato"), ("sort", "-unitPrice,title")]);
        let sort = stage(&pipeline, "$sort").unwrap();
        assert_eq!(sort, &doc! { "unitPrice": -1, "title": 1, "_id": 1 });
        let keys: Vec<&String> = sort.keys().collect();
        assert_eq!(keys, ["unitPrice", "title", "_id"]);
    }

    #[test]
    fn test_sort_ends_with_id_tie_breaker() {
        let schema = schema();
        let pipeline = compile(&schema, &[("page", "2"), ("limit", "10")]);
        assert_eq!(
            stage(&pipeline, "$sort").unwrap(),
            &doc! { "createdAt": -1, "_id": -1 }
        );

        let pipeline = compile(&schema, &[("sort", "unitPrice")]);
        assert_eq!(
            stage(&pipeline, "$sort").unwrap(),
            &doc! { "unitPrice": 1, "_id": 1 }
        );

        let pipeline = compile(&schema, &[("sort", "title,-unitPrice")]);
        let keys: Vec<&String> = stage(&pipeline, "$sort").unwrap().keys().collect();
        assert_eq!(keys, ["title", "unitPrice", "_id"]);
    }

    #[test]
    fn test_operators_become_dollar_prefixed_numbers() {
        let schema = schema();
        let pipeline = compile(
            &schema,
            &[
                ("unitPrice[gte]", "10"),
                ("unitPrice[lte]", "100"),
                ("averageRating[gt]", "3.5"),
            ],
        );
        assert_eq!(
            stage(&pipeline, "$match").unwrap(),
            &doc! {
                "averageRating": { "$gt": 3.5 },
                "unitPrice": { "$gte": 10_i64, "$lte": 100_i64 },
            }
        );
    }

    #[test]
    fn test_list_values_match_any_element() {
        let schema = schema();
        let pipeline = compile(&schema, &[("categories", "fruit,tools")]);
        assert_eq!(
            stage(&pipeline, "$match").unwrap(),
            &doc! { "categories": { "$elemMatch": { "$in": ["fruit", "tools"] } } }
        );
    }

    #[test]
    fn test_reserved_keys_never_reach_match() {
        let schema = schema();
        let pipeline = compile(
            &schema,
            &[
                ("page", "2"),
                ("limit", "5"),
                ("sort", "title"),
                ("fields", "title"),
                ("q", "basil"),
            ],
        );
        assert_eq!(stage(&pipeline, "$match").unwrap(), &Document::new());
    }

    #[test]
    fn test_projection_forms() {
        let schema = schema();
        let pipeline = compile(&schema, &[("fields", "title,unitPrice")]);
        assert_eq!(
            stage(&pipeline, "$project").unwrap(),
            &doc! { "title": 1, "unitPrice": 1 }
        );

        let pipeline = compile(&schema, &[("fields", "title,-_id")]);
        assert_eq!(
            stage(&pipeline, "$project").unwrap(),
            &doc! { "title": 1, "_id": 0 }
        );

        let pipeline = compile(&schema, &[("fields", "-description")]);
        assert_eq!(
            stage(&pipeline, "$project").unwrap(),
            &doc! { "description": 0 }
        );
    }

    #[test]
    fn test_pagination_skips_whole_pages() {
        let schema = schema();
        let pipeline = compile(&schema, &[("page", "2"), ("limit", "10")]);
        assert_eq!(
            stage(&pipeline, "$facet").unwrap(),
            &doc! {
                "metadata": [{ "$count": "totalResults" }],
                "data": [{ "$skip": 10_i64 }, { "$limit": 10_i64 }],
            }
        );
    }

    #[test]
    fn test_steps_out_of_order_still_render_in_order() {
        let schema = schema();
        let spec = QuerySpec::from_pairs([("q", "basil")]).unwrap();
        let features = QueryFeatures::from_spec(&schema, &spec)
            .unwrap()
            .paginate()
            .limit_fields()
            .filter()
            .search();
        assert_eq!(
            names(&features.pipeline()),
            ["$search", "$match", "$project", "$facet", "$unwind"]
        );
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let schema = schema();
        let pairs = [
            ("categories", "fruit,tools"),
            ("unitPrice[gte]", "1"),
            ("sort", "-createdAt"),
            ("fields", "title"),
        ];
        assert_eq!(compile(&schema, &pairs), compile(&schema, &pairs));
    }

    #[test]
    fn test_invalid_spec_never_compiles() {
        let schema = schema();
        let spec = QuerySpec::from_pairs([("unitPrice[gte]", "abc")]).unwrap();
        let err = QueryFeatures::from_spec(&schema, &spec).unwrap_err();
        match err {
            crate::QueryError::Invalid(violations) => {
                assert_eq!(violations[0].path, "unitPrice.gte")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
