use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
};
use axum_helpers::{
    ApiResponse, DEFAULT_LIMIT, JsonBody, PageParams, Pager, require_authorization,
    errors::responses::{
        BadRequestJsonResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse, ValidationErrorResponse,
    },
};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::error::{InventoryError, InventoryResult};
use crate::models::{
    DeletedBody, IdBody, ProductBody, ProductChanges, ProductListBody, ProductPatch,
    ProductView, RateProduct,
};
use crate::repository::{ProductRepository, RatingRepository};
use crate::service::{FilterParams, ProductService, filter_params};

const TAG: &str = "products";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        replace_product,
        patch_product,
        delete_product,
        rate_product,
    ),
    components(
        schemas(
            ProductView,
            ProductChanges,
            ProductPatch,
            RateProduct,
            ProductListBody,
            ProductBody,
            IdBody,
            DeletedBody,
            Pager
        ),
        responses(
            BadRequestJsonResponse,
            ValidationErrorResponse,
            NotFoundResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product inventory and ratings")
    )
)]
pub struct ApiDoc;

/// Listing filters. Unparsable values are ignored; only the first value of a
/// repeated key is used.
#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilterParams {
    /// SQL `LIKE` pattern, e.g. `Wid%`
    pub name: Option<String>,
    /// Maximum price (inclusive)
    pub price: Option<i32>,
    /// Maximum weight (inclusive)
    pub weight: Option<i32>,
    pub available: Option<bool>,
    /// Rows to skip
    pub skip: Option<u64>,
    /// Page size, 20 when absent or 0
    pub limit: Option<u64>,
}

/// Product routes. Writes other than rating need an `Authorization` header.
pub fn router<P, R>(service: ProductService<P, R>) -> Router
where
    P: ProductRepository + 'static,
    R: RatingRepository + 'static,
{
    let shared_service = Arc::new(service);
    let auth = || middleware::from_fn(require_authorization);

    Router::new()
        .route(
            "/",
            get(list_products::<P, R>)
                .merge(post(create_product::<P, R>).route_layer(auth())),
        )
        .route(
            "/{id}",
            get(get_product::<P, R>).merge(
                put(replace_product::<P, R>)
                    .patch(patch_product::<P, R>)
                    .delete(delete_product::<P, R>)
                    .route_layer(auth()),
            ),
        )
        .route("/{id}/rating", post(rate_product::<P, R>))
        .with_state(shared_service)
}

fn page_params(params: &FilterParams) -> PageParams {
    let first = |key: &str| params.get(key).and_then(|values| values.first()).cloned();
    PageParams {
        skip: first("skip"),
        limit: first("limit"),
    }
}

/// List products, filtered and paged
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ProductFilterParams),
    responses(
        (status = 200, description = "Page of products", body = ProductListBody),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<P: ProductRepository, R: RatingRepository>(
    State(service): State<Arc<ProductService<P, R>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> InventoryResult<Json<ApiResponse<Vec<ProductView>>>> {
    let params = filter_params(pairs);
    let (skip, limit) = page_params(&params).resolve(DEFAULT_LIMIT);

    let page = service.page(&params, skip, limit).await?;
    Ok(Json(ApiResponse::paged(page.items, page.pager)))
}

/// Create a product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    params(("Authorization" = String, Header, description = "Any non-empty token")),
    request_body = ProductChanges,
    responses(
        (status = 201, description = "Product created", body = IdBody),
        (status = 400, response = BadRequestJsonResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<P: ProductRepository, R: RatingRepository>(
    State(service): State<Arc<ProductService<P, R>>>,
    JsonBody(input): JsonBody<ProductChanges>,
) -> InventoryResult<(StatusCode, Json<ApiResponse<String>>)> {
    let id = service.add(input.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(id))))
}

/// Get a product with its average rating
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductBody),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<P: ProductRepository, R: RatingRepository>(
    State(service): State<Arc<ProductService<P, R>>>,
    Path(id): Path<String>,
) -> InventoryResult<Json<ApiResponse<ProductView>>> {
    let view = service.view(&id).await?;
    Ok(Json(ApiResponse::data(view)))
}

/// Replace every mutable field of a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "Product id"),
        ("Authorization" = String, Header, description = "Any non-empty token")
    ),
    request_body = ProductChanges,
    responses(
        (status = 200, description = "Product updated", body = IdBody),
        (status = 400, response = BadRequestJsonResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn replace_product<P: ProductRepository, R: RatingRepository>(
    State(service): State<Arc<ProductService<P, R>>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ProductChanges>,
) -> InventoryResult<Json<ApiResponse<String>>> {
    let id = service.replace(&id, input).await?;
    Ok(Json(ApiResponse::data(id)))
}

/// Change only the fields present in the body
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "Product id"),
        ("Authorization" = String, Header, description = "Any non-empty token")
    ),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Product updated", body = IdBody),
        (status = 400, response = BadRequestJsonResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn patch_product<P: ProductRepository, R: RatingRepository>(
    State(service): State<Arc<ProductService<P, R>>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ProductPatch>,
) -> InventoryResult<Json<ApiResponse<String>>> {
    let id = service.patch(&id, input).await?;
    Ok(Json(ApiResponse::data(id)))
}

/// Delete a product; deleting an absent product also succeeds
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "Product id"),
        ("Authorization" = String, Header, description = "Any non-empty token")
    ),
    responses(
        (status = 200, description = "Product deleted", body = DeletedBody),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<P: ProductRepository, R: RatingRepository>(
    State(service): State<Arc<ProductService<P, R>>>,
    Path(id): Path<String>,
) -> InventoryResult<Json<ApiResponse<bool>>> {
    match service.remove(&id).await {
        Ok(()) | Err(InventoryError::NotFound(_)) => Ok(Json(ApiResponse::data(true))),
        Err(e) => Err(e),
    }
}

/// Rate a product from 1 to 5
#[utoipa::path(
    post,
    path = "/{id}/rating",
    tag = TAG,
    params(("id" = String, Path, description = "Product id")),
    request_body = RateProduct,
    responses(
        (status = 201, description = "Rating stored", body = IdBody),
        (status = 400, response = BadRequestJsonResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn rate_product<P: ProductRepository, R: RatingRepository>(
    State(service): State<Arc<ProductService<P, R>>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<RateProduct>,
) -> InventoryResult<(StatusCode, Json<ApiResponse<String>>)> {
    let rating_id = service.rate(&id, input.value).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(rating_id))))
}
