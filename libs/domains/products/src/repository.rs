use async_trait::async_trait;
use mongodb::bson::Document;
use query_pipeline::FacetResult;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct};

/// Data access for products
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Every product, unpaginated
    async fn list_all(&self) -> ProductResult<Vec<Product>>;

    /// Run a compiled `$facet` pipeline and return its single result document.
    async fn aggregate(&self, pipeline: Vec<Document>) -> ProductResult<FacetResult>;

    /// Apply `input` and bump `__v`; `Ok(None)` when the product is missing.
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>>;

    /// `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}
