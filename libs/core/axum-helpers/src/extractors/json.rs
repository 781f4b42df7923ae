use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;

/// `Json<T>` whose rejection is a 400 [`AppError`] body.
///
/// Field validation is left to the domain layer, so a well-formed body with bad
/// values gets through and is answered with 422 later.
///
/// ```ignore
/// async fn create(JsonBody(input): JsonBody<CreateProduct>) -> Result<..., AppError> { .. }
/// ```
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}
