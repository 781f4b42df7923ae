//! Filter maps and the parameterized predicates built from them.
//!
//! A [`FilterQuery`] maps a column to one or more values. Distinct keys are
//! AND-ed together in a fixed column order so the same filter always renders
//! the same SQL and placeholder numbering. Only the first value of each key
//! takes part in the predicate.

use sea_orm::Value;
use std::collections::BTreeMap;

/// A value bound to a filter placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i32),
    Bool(bool),
}

impl From<FilterValue> for Value {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Text(s) => s.into(),
            FilterValue::Int(n) => n.into(),
            FilterValue::Bool(b) => b.into(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        FilterValue::Int(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

/// Column name to filter values; repeated keys accumulate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterQuery(BTreeMap<String, Vec<FilterValue>>);

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.add(key, value);
        self
    }

    /// First value recorded for `key`.
    pub fn first(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key).and_then(|values| values.first())
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

/// SQL boolean fragment and the values for its placeholders, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    pub sql: String,
    pub values: Vec<Value>,
}

impl Predicate {
    /// An empty predicate must not be rendered; callers use the unfiltered path.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

const PRODUCT_FILTERS: [(&str, &str); 4] = [
    ("name", "LIKE"),
    ("price", "<="),
    ("weight", "<="),
    ("available", "="),
];

const RATING_FILTERS: [(&str, &str); 1] = [("product_id", "=")];

/// Product predicate over `name` (pattern), `price` and `weight` (upper
/// bounds) and `available` (equality). Placeholders start at
/// `$first_placeholder`.
pub fn product_predicate(query: &FilterQuery, first_placeholder: usize) -> Predicate {
    build(query, &PRODUCT_FILTERS, first_placeholder)
}

/// Rating predicate over `product_id` (equality).
pub fn rating_predicate(query: &FilterQuery, first_placeholder: usize) -> Predicate {
    build(query, &RATING_FILTERS, first_placeholder)
}

fn build(query: &FilterQuery, columns: &[(&str, &str)], first_placeholder: usize) -> Predicate {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    for (column, op) in columns {
        if let Some(value) = query.first(column) {
            clauses.push(format!(
                "\"{column}\" {op} ${}",
                first_placeholder + values.len()
            ));
            values.push(value.clone().into());
        }
    }

    Predicate {
        sql: clauses.join(" AND "),
        values,
    }
}
