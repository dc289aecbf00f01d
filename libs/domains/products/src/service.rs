//! Product Service - Business logic layer

use query_pipeline::{QueryFeatures, QuerySchema, QuerySpec, ResultEnvelope};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::repository::ProductRepository;

pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    schema: QuerySchema,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R, schema: QuerySchema) -> Self {
        Self {
            repository: Arc::new(repository),
            schema,
        }
    }

    pub fn schema(&self) -> &QuerySchema {
        &self.schema
    }

    #[instrument(skip(self, input), fields(product_title = %input.title))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// Every product; an empty collection is reported as not found.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        let products = self.repository.list_all().await?;
        if products.is_empty() {
            return Err(ProductError::Empty);
        }
        Ok(products)
    }

    /// Validate `spec`, compile it and return one page of results.
    #[instrument(skip(self, spec), fields(params = spec.len()))]
    pub async fn query_products(&self, spec: &QuerySpec) -> ProductResult<ResultEnvelope> {
        let features = QueryFeatures::from_spec(&self.schema, spec)?
            .search()
            .filter()
            .sort()
            .limit_fields()
            .paginate();

        let facet = self.repository.aggregate(features.pipeline()).await?;
        let query = features.query();

        tracing::debug!(
            total_results = facet.total_results(),
            page = query.page,
            limit = query.limit,
            "Product query finished"
        );
        Ok(ResultEnvelope::from_facet(facet, query.page, query.limit))
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository
            .update(id, input)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductStatus, ProductUnit};
    use crate::query::product_query_schema;
    use crate::repository::MockProductRepository;
    use core_config::query::QueryConfig;
    use mongodb::bson::{doc, Document};
    use query_pipeline::{FacetCount, FacetResult};

    fn service(repo: MockProductRepository) -> ProductService<MockProductRepository> {
        ProductService::new(repo, product_query_schema(&QueryConfig::default()))
    }

    fn stage_names(pipeline: &[Document]) -> Vec<String> {
        pipeline
            .iter()
            .filter_map(|stage| stage.keys().next().cloned())
            .collect()
    }

    fn create_input() -> CreateProduct {
        CreateProduct {
            title: "Basil seedling".to_string(),
            description: "Organic basil in a 9cm pot".to_string(),
            unit_price: 350,
            unit: ProductUnit::Pot,
            available_stock: 40,
            media: vec!["https://cdn.example.com/basil.jpg".to_string()],
            categories: vec!["herbs".to_string()],
            dimension: None,
            seller_id: None,
            status: ProductStatus::Public,
        }
    }

    #[tokio::test]
    async fn test_list_products_empty_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_list_all().returning(|| Ok(vec![]));

        let result = service(mock_repo).list_products().await;
        assert!(matches!(result, Err(ProductError::Empty)));
    }

    #[tokio::test]
    async fn test_create_product_rejects_invalid_input_without_touching_storage() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let mut input = create_input();
        input.title = "ab".to_string();
        let result = service(mock_repo).create_product(input).await;
        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_product_passes_valid_input_through() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_create()
            .times(1)
            .returning(|input| Ok(Product::new(input)));

        let product = service(mock_repo)
            .create_product(create_input())
            .await
            .unwrap();
        assert!(product.slug.starts_with("basil-seedling-"));
    }

    #[tokio::test]
    async fn test_query_products_compiles_pipeline_and_paginates() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_aggregate()
            .withf(|pipeline| {
                stage_names(pipeline) == ["$match", "$sort", "$project", "$facet", "$unwind"]
                    && pipeline[1] == doc! { "$sort": { "unitPrice": -1, "_id": -1 } }
            })
            .returning(|_| {
                Ok(FacetResult {
                    data: vec![doc! { "title": "Mint" }],
                    metadata: Some(FacetCount { total_results: 25 }),
                })
            });

        let spec = QuerySpec::from_pairs([("sort", "-unitPrice"), ("page", "2"), ("limit", "10")])
            .unwrap();
        let envelope = service(mock_repo).query_products(&spec).await.unwrap();

        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.metadata.total_results, 25);
        assert_eq!(envelope.metadata.current_page, 2);
        assert_eq!(envelope.metadata.total_pages, 3);
        assert_eq!(envelope.metadata.limit, 10);
    }

    #[tokio::test]
    async fn test_query_products_with_search_starts_with_search_stage() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_aggregate()
            .withf(|pipeline| {
                let index = pipeline[0]
                    .get_document("$search")
                    .and_then(|search| search.get_str("index"));
                stage_names(pipeline) == ["$search", "$match", "$project", "$facet", "$unwind"]
                    && index == Ok("product-search")
            })
            .returning(|_| Ok(FacetResult::default()));

        let spec = QuerySpec::from_pairs([("q", "basil")]).unwrap();
        let envelope = service(mock_repo).query_products(&spec).await.unwrap();

        assert!(envelope.data.is_empty());
        assert_eq!(envelope.metadata.total_results, 0);
        assert_eq!(envelope.metadata.total_pages, 0);
        assert_eq!(envelope.metadata.limit, 20);
    }

    #[tokio::test]
    async fn test_query_products_reports_every_violation() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_aggregate().never();

        let spec = QuerySpec::from_pairs([
            ("unitPrice[gte]", "cheap"),
            ("limit", "1000"),
            ("page", "0"),
        ])
        .unwrap();
        let result = service(mock_repo).query_products(&spec).await;

        match result {
            Err(ProductError::Query(query_pipeline::QueryError::Invalid(violations))) => {
                let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
                assert!(paths.contains(&"unitPrice.gte"));
                assert!(paths.contains(&"limit"));
                assert!(paths.contains(&"page"));
            }
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();
        mock_repo
            .expect_update()
            .with(mockall::predicate::eq(id), mockall::predicate::always())
            .returning(|_, _| Ok(None));

        let result = service(mock_repo)
            .update_product(id, UpdateProduct::default())
            .await;
        assert!(matches!(result, Err(ProductError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let id = Uuid::now_v7();
        let result = service(mock_repo).delete_product(id).await;
        assert!(matches!(result, Err(ProductError::NotFound(missing)) if missing == id));
    }
}
