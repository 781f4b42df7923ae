use axum_helpers::Pager;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Stored product.
///
/// `id` is assigned by the repository on create; a caller-supplied value is
/// overwritten.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct Product {
    #[validate(length(min = 1, message = "is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "is empty"))]
    pub name: String,
    #[validate(range(min = 1, message = "is required"))]
    pub price: i32,
    #[validate(range(min = 1, message = "is invalid"))]
    pub weight: i32,
    pub available: bool,
    pub deleted: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Rating attached to a product. Ratings are never updated or deleted.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct Rating {
    #[validate(length(min = 1, message = "is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "is empty"))]
    pub product_id: String,
    #[validate(range(min = 1, max = 5, message = "is invalid"))]
    pub value: i32,
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /` and `PUT /{id}`.
///
/// Missing fields take their zero value and are then rejected by validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProductChanges {
    #[schema(example = "Widget")]
    pub name: String,
    #[schema(example = 100)]
    pub price: i32,
    #[schema(example = 1)]
    pub weight: i32,
    pub available: bool,
}

impl ProductChanges {
    /// Overwrites every mutable field of `product`.
    pub fn apply_to(self, product: &mut Product) {
        product.name = self.name;
        product.price = self.price;
        product.weight = self.weight;
        product.available = self.available;
    }
}

impl From<ProductChanges> for Product {
    fn from(changes: ProductChanges) -> Self {
        let mut product = Product::default();
        changes.apply_to(&mut product);
        product
    }
}

/// Body of `PATCH /{id}`: only present fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<i32>,
    pub weight: Option<i32>,
    pub available: Option<bool>,
}

impl ProductPatch {
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(weight) = self.weight {
            product.weight = weight;
        }
        if let Some(available) = self.available {
            product.available = available;
        }
    }
}

/// Body of `POST /{id}/rating`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RateProduct {
    /// 1 to 5 inclusive
    #[schema(example = 4)]
    pub value: i32,
}

/// Product as rendered to clients, with its average rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: i32,
    pub weight: i32,
    pub available: bool,
    /// 0 when the product has no ratings
    #[serde(rename = "avgRating")]
    pub avg_rating: f64,
}

impl ProductView {
    pub fn new(product: Product, avg_rating: f64) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            weight: product.weight,
            available: product.available,
            avg_rating,
        }
    }
}

/// A page of products and its `meta` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub items: Vec<ProductView>,
    pub pager: Pager,
}

// Documentation shapes of the `{"data": ..}` envelope.

#[derive(ToSchema)]
pub struct ProductListBody {
    pub data: Vec<ProductView>,
    pub meta: Pager,
}

#[derive(ToSchema)]
pub struct ProductBody {
    pub data: ProductView,
}

#[derive(ToSchema)]
pub struct IdBody {
    #[schema(example = "0192f0c1-7c2e-7d31-a1b2-3c4d5e6f7a8b")]
    pub data: String,
}

#[derive(ToSchema)]
pub struct DeletedBody {
    pub data: bool,
}
