use std::collections::BTreeMap;

use crate::query::FilterQuery;

/// Raw query-string parameters; a repeated key keeps every value.
pub type FilterParams = BTreeMap<String, Vec<String>>;

/// Groups `key=value` pairs, keeping the order of repeated keys.
pub fn filter_params<I, K, V>(pairs: I) -> FilterParams
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut params = FilterParams::new();
    for (key, value) in pairs {
        params.entry(key.into()).or_default().push(value.into());
    }
    params
}

/// Keeps the product filters that parse. Unknown keys and unparsable values
/// are dropped without error.
///
/// - `name`: first value, when non-empty
/// - `price`, `weight`: first value as a positive integer
/// - `available`: first value as a boolean
pub fn product_filter(params: &FilterParams) -> FilterQuery {
    let mut query = FilterQuery::new();

    if let Some(name) = first(params, "name").filter(|name| !name.is_empty()) {
        query.add("name", name);
    }
    for key in ["price", "weight"] {
        if let Some(bound) = first(params, key).and_then(parse_positive) {
            query.add(key, bound);
        }
    }
    if let Some(available) = first(params, "available").and_then(parse_bool) {
        query.add("available", available);
    }

    query
}

fn first<'a>(params: &'a FilterParams, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .and_then(|values| values.first())
        .map(String::as_str)
}

fn parse_positive(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().filter(|n| *n > 0)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
