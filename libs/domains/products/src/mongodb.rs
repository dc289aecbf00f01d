//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::Utc;
use database::mongodb::serde_helpers::uuid_to_bson;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use query_pipeline::{aggregate_facet, FacetResult};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct, PRODUCTS_COLLECTION};
use crate::repository::ProductRepository;

pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_slug_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "status": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_status".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "sellerId": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_seller".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "categories": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_categories".to_string())
                        .build(),
                )
                .build(),
            // Default newest-first ordering of the query endpoint
            IndexModel::builder()
                .keys(doc! { "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// Untyped view of the collection, as the query endpoint projects fields away
    pub fn documents(&self) -> Collection<Document> {
        self.collection.clone_with_type()
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": uuid_to_bson(&id) }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_title = %input.title))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);

        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, slug = %product.slug, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> ProductResult<Vec<Product>> {
        let cursor = self.collection.find(doc! {}).await?;
        let products: Vec<Product> = cursor.try_collect().await?;
        Ok(products)
    }

    #[instrument(skip(self, pipeline), fields(stages = pipeline.len()))]
    async fn aggregate(&self, pipeline: Vec<Document>) -> ProductResult<FacetResult> {
        let facet = aggregate_facet(&self.collection, pipeline).await?;
        Ok(facet)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let Some(mut product) = self.collection.find_one(Self::id_filter(id)).await? else {
            return Ok(None);
        };

        let seen_version = product.version;
        product.apply_update(input, Utc::now());

        // Only replace the version we read
        let mut filter = Self::id_filter(id);
        filter.insert("__v", seen_version);
        let result = self.collection.replace_one(filter, &product).await?;

        if result.matched_count == 0 {
            return Err(ProductError::VersionConflict(id));
        }

        tracing::info!(product_id = %id, version = product.version, "Product updated successfully");
        Ok(Some(product))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }
}
