//! HTTP handlers for Reviews API

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, routing::post, Json,
    Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ReviewResult;
use crate::models::{CreateReview, Review};
use crate::repository::ReviewRepository;
use crate::service::ReviewService;

#[derive(OpenApi)]
#[openapi(
    paths(create_review, get_review, list_product_reviews),
    components(
        schemas(Review, CreateReview),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Reviews", description = "Product reviews and ratings")
    )
)]
pub struct ApiDoc;

pub fn router<R: ReviewRepository + 'static>(service: ReviewService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(create_review))
        .route("/{id}", get(get_review))
        .route("/product/{id}", get(list_product_reviews))
        .with_state(shared_service)
}

/// Review a product
///
/// Updates the product's review count, average rating and embedded reviews.
#[utoipa::path(
    post,
    path = "",
    tag = "Reviews",
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created successfully", body = Review),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_review<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateReview>,
) -> ReviewResult<impl IntoResponse> {
    let review = service.create_review(input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Get a review by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Reviews",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review found", body = Review),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_review<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
    UuidPath(id): UuidPath,
) -> ReviewResult<Json<Review>> {
    let review = service.get_review(id).await?;
    Ok(Json(review))
}

/// List the reviews of a product, newest first
#[utoipa::path(
    get,
    path = "/product/{id}",
    tag = "Reviews",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Reviews of the product", body = Vec<Review>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_product_reviews<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
    UuidPath(id): UuidPath,
) -> ReviewResult<Json<Vec<Review>>> {
    let reviews = service.list_product_reviews(id).await?;
    Ok(Json(reviews))
}
