//! Caller-supplied filter values.
//!
//! A [`FilterRequest`] maps attribute names to requested values. It is built per
//! call, usually straight from a query string or a JSON body, and may contain keys
//! the model knows nothing about; those are dropped when filters are applied.

use scopefilter_core::{FilterError, FilterResult, FilterValue};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap, Entry};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterRequest {
    values: BTreeMap<String, FilterValue>,
}

impl FilterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value (builder pattern).
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(attribute, value);
        self
    }

    /// Set a value, replacing any previous one.
    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<FilterValue>) {
        self.values.insert(attribute.into(), value.into());
    }

    /// Add a value, turning repeated attributes into a list.
    pub fn append(&mut self, attribute: impl Into<String>, value: impl Into<FilterValue>) {
        let value = value.into();
        match self.values.entry(attribute.into()) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => {
                let mut items = std::mem::take(entry.get_mut()).into_list();
                items.push(value);
                *entry.get_mut() = FilterValue::List(items);
            }
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&FilterValue> {
        self.values.get(attribute)
    }

    /// The value for `attribute` if it is present and not null.
    pub fn value_of(&self, attribute: &str) -> Option<&FilterValue> {
        self.get(attribute).filter(|value| !value.is_null())
    }

    pub fn contains_key(&self, attribute: &str) -> bool {
        self.values.contains_key(attribute)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse `name=Jo&tag=a&tag=b` style input.
    ///
    /// Repeated keys, and keys written as `tag[]`, collect into a list. Values stay
    /// strings, as they would arrive from a browser.
    pub fn from_query_string(query: &str) -> FilterResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| FilterError::Serialization(e.to_string()))?;

        let mut request = Self::new();
        for (key, value) in pairs {
            match key.strip_suffix("[]") {
                Some(list_key) => {
                    if !request.contains_key(list_key) {
                        request.insert(list_key, FilterValue::List(Vec::new()));
                    }
                    request.append(list_key, value);
                }
                None => request.append(key, value),
            }
        }
        Ok(request)
    }

    /// Build a request from a JSON object.
    pub fn from_json(value: serde_json::Value) -> FilterResult<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(key, value)| (key, FilterValue::from(value)))
                .collect()),
            other => Err(FilterError::Validation(format!(
                "filter request must be a JSON object, got {}",
                other
            ))),
        }
    }

    /// Flatten into query-string pairs in key order.
    ///
    /// Nulls are skipped and lists become repeated keys.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.values {
            match value {
                FilterValue::List(items) => pairs.extend(
                    items
                        .iter()
                        .filter_map(FilterValue::to_param_string)
                        .map(|item| (key.clone(), item)),
                ),
                scalar => {
                    if let Some(s) = scalar.to_param_string() {
                        pairs.push((key.clone(), s));
                    }
                }
            }
        }
        pairs
    }

    pub fn to_query_string(&self) -> FilterResult<String> {
        serde_urlencoded::to_string(self.to_pairs())
            .map_err(|e| FilterError::Serialization(e.to_string()))
    }
}

impl<K, V> FromIterator<(K, V)> for FilterRequest
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut request = Self::new();
        for (key, value) in iter {
            request.insert(key, value);
        }
        request
    }
}

impl<'a> IntoIterator for &'a FilterRequest {
    type Item = (&'a String, &'a FilterValue);
    type IntoIter = btree_map::Iter<'a, String, FilterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for FilterRequest {
    type Item = (String, FilterValue);
    type IntoIter = btree_map::IntoIter<String, FilterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
