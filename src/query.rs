//! Route query strings: the comma-separated array codec and the typed query
//! state of the list views.

use std::collections::{BTreeMap, HashMap};

/// One query parameter, possibly repeated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    /// Repeated parameter. `None` entries are parameters without a value.
    Multi(Vec<Option<String>>),
}

impl QueryValue {
    /// The value as one string, repeated values joined with commas
    pub fn as_joined(&self) -> String {
        match self {
            QueryValue::Single(value) => value.clone(),
            QueryValue::Multi(values) => values
                .iter()
                .map(|value| value.as_deref().unwrap_or(""))
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            QueryValue::Single(value) => value.is_empty(),
            QueryValue::Multi(_) => false,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

/// Query of a route location
pub type Query = BTreeMap<String, QueryValue>;

/// Decode a comma-separated list parameter.
///
/// A missing or empty parameter yields `fallback`. Repeated parameters are
/// flattened, and every item is trimmed.
pub fn parse_query_array(param: Option<&QueryValue>, fallback: &[&str]) -> Vec<String> {
    let split = |value: &str| {
        value
            .split(',')
            .map(|item| item.trim().to_string())
            .collect::<Vec<_>>()
    };

    match param {
        None => fallback.iter().map(|item| item.to_string()).collect(),
        Some(value) if value.is_empty() => fallback.iter().map(|item| item.to_string()).collect(),
        Some(QueryValue::Single(value)) => split(value.as_str()),
        Some(QueryValue::Multi(values)) => values.iter().flatten().flat_map(|v| split(v.as_str())).collect(),
    }
}

/// Encode a list parameter
pub fn stringify_query_array<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

fn read_string(query: &Query, key: &str) -> String {
    query.get(key).map(QueryValue::as_joined).unwrap_or_default()
}

fn read_number(query: &Query, key: &str, default: u32) -> u32 {
    query
        .get(key)
        .map(QueryValue::as_joined)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn write_string(query: &mut Query, key: &str, value: &str) {
    if value.is_empty() {
        query.remove(key);
    } else {
        query.insert(key.to_string(), value.into());
    }
}

fn write_number(query: &mut Query, key: &str, value: u32) {
    if value == 0 {
        query.remove(key);
    } else {
        query.insert(key.to_string(), value.to_string().into());
    }
}

/// Search and paging of the customer list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomersQuery {
    pub search: String,
    pub page: u32,
    pub page_size: u32,
}

impl Default for CustomersQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            page_size: 20,
        }
    }
}

impl CustomersQuery {
    pub fn from_query(query: &Query) -> Self {
        Self {
            search: read_string(query, "search"),
            page: read_number(query, "page", 1),
            page_size: read_number(query, "page_size", 20),
        }
    }

    /// Write the state back, dropping empty values
    pub fn write(&self, query: &mut Query) {
        write_string(query, "search", &self.search);
        write_number(query, "page", self.page);
        write_number(query, "page_size", self.page_size);
    }

    /// Parameters for the customer list endpoint
    pub fn to_params(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        if !self.search.is_empty() {
            params.insert("search".to_string(), self.search.clone());
        }
        params.insert("page".to_string(), self.page.to_string());
        params.insert("page_size".to_string(), self.page_size.to_string());
        params
    }
}

/// Filters of the product detail view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub location: String,
    pub location_search: String,
    pub item_search: String,
}

impl ProductQuery {
    pub fn from_query(query: &Query) -> Self {
        Self {
            location: read_string(query, "location"),
            location_search: read_string(query, "locationSearch"),
            item_search: read_string(query, "itemSearch"),
        }
    }

    pub fn write(&self, query: &mut Query) {
        write_string(query, "location", &self.location);
        write_string(query, "locationSearch", &self.location_search);
        write_string(query, "itemSearch", &self.item_search);
    }
}

/// Selected location of the warehouse view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarehouseQuery {
    pub location: String,
}

impl WarehouseQuery {
    pub fn from_query(query: &Query) -> Self {
        Self {
            location: read_string(query, "location"),
        }
    }

    pub fn write(&self, query: &mut Query) {
        write_string(query, "location", &self.location);
    }
}
