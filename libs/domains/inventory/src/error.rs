use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Names the missing resource, e.g. `"product"`.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(String),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

impl From<DbErr> for InventoryError {
    fn from(err: DbErr) -> Self {
        InventoryError::Database(err.to_string())
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Validation(fields) => AppError::Validation {
                message: fields.to_string(),
                details: serde_json::to_value(&fields).unwrap_or_default(),
            },
            not_found @ InventoryError::NotFound(_) => AppError::NotFound(not_found.to_string()),
            InventoryError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
