//! Offset pagination: query parsing, the `meta` block and the success envelope.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Page size used when `limit` is absent, zero or unparsable.
pub const DEFAULT_LIMIT: u64 = 20;

/// Raw `skip`/`limit` query parameters.
///
/// Values are kept as strings so that garbage degrades to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Rows to skip; negative or unparsable means 0
    pub skip: Option<String>,
    /// Page size; 0, negative or unparsable means the default (20)
    pub limit: Option<String>,
}

impl PageParams {
    /// Returns `(skip, limit)`.
    pub fn resolve(&self, default_limit: u64) -> (u64, u64) {
        let skip = parse_non_negative(self.skip.as_deref());
        let limit = match parse_non_negative(self.limit.as_deref()) {
            0 => default_limit,
            n => n,
        };
        (skip, limit)
    }
}

fn parse_non_negative(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|n| n.max(0) as u64)
        .unwrap_or(0)
}

/// `meta` block of a paged response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pager {
    pub offset: u64,
    /// Number of items on this page
    pub take: u64,
    pub total: u64,
}

impl Pager {
    pub fn new(total: u64, skip: u64, limit: u64) -> Self {
        Self {
            offset: skip,
            take: total.saturating_sub(skip).min(limit),
            total,
        }
    }

    /// True when `skip` is past the last row and no query is needed.
    pub fn is_past_end(&self) -> bool {
        self.total <= self.offset
    }
}

/// Success envelope: `{"data": ..., "meta": {...}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub meta: Option<Pager>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self { data, meta: None }
    }

    pub fn paged(data: T, meta: Pager) -> Self {
        Self {
            data,
            meta: Some(meta),
        }
    }
}
