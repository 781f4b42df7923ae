use crate::errors::AppError;
use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Rejects requests without a non-empty `Authorization` header.
///
/// The token itself is not verified; any non-blank value passes.
///
/// ```ignore
/// use axum::{Router, middleware, routing::post};
/// use axum_helpers::require_authorization;
///
/// let writes = Router::new()
///     .route("/", post(create))
///     .route_layer(middleware::from_fn(require_authorization));
/// ```
pub async fn require_authorization(request: Request, next: Next) -> Response {
    let present = request
        .headers()
        .get(AUTHORIZATION)
        .is_some_and(|value| !value.as_bytes().iter().all(u8::is_ascii_whitespace));

    if !present {
        tracing::debug!(uri = %request.uri(), "Rejected request without Authorization header");
        return AppError::Unauthorized("Unauthorized".to_string()).into_response();
    }

    next.run(request).await
}
