use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Inventory API",
        version = "0.1.0",
        description = "Products with soft delete, filtered listing and ratings"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = crate::api::PRODUCTS_PATH, api = domain_inventory::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
