//! Filter values.
//!
//! A [`FilterValue`] is what a caller asks an attribute to be filtered by. Values
//! usually arrive from query strings or JSON bodies, so comparisons are loose:
//! numeric strings compare as numbers and ISO dates compare chronologically.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Parse a raw string the way a command line or form field would supply it.
    pub fn parse_loose(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return FilterValue::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return FilterValue::Float(f);
            }
        }
        match trimmed {
            "true" => FilterValue::Bool(true),
            "false" => FilterValue::Bool(false),
            _ => FilterValue::String(raw.to_string()),
        }
    }

    /// A null value counts as "not supplied".
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Scalars become a one-element list; null becomes an empty list.
    pub fn into_list(self) -> Vec<FilterValue> {
        match self {
            FilterValue::List(items) => items,
            FilterValue::Null => Vec::new(),
            other => vec![other],
        }
    }

    /// Render a scalar as it would appear in a query string.
    ///
    /// Returns `None` for null and list values.
    pub fn to_param_string(&self) -> Option<String> {
        match self {
            FilterValue::Null | FilterValue::List(_) => None,
            FilterValue::Bool(b) => Some(b.to_string()),
            FilterValue::Int(i) => Some(i.to_string()),
            FilterValue::Float(f) => Some(f.to_string()),
            FilterValue::String(s) => Some(s.clone()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FilterValue::Int(i) => Some(*i as f64),
            FilterValue::Float(f) => Some(*f),
            FilterValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    /// Interpret a string as an RFC 3339 timestamp or a `YYYY-MM-DD` date.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        let s = self.as_str()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Some(dt);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN))
    }

    /// Loose ordering between two values.
    ///
    /// Two numbers (or numeric strings) compare numerically and two dates compare
    /// chronologically. Any other pair of scalars falls back to comparing their
    /// text, so `5` sorts before `"abc"`. Returns `None` for nulls and lists.
    pub fn compare(&self, other: &FilterValue) -> Option<Ordering> {
        match (self, other) {
            (FilterValue::Null, _) | (_, FilterValue::Null) => None,
            (FilterValue::List(_), _) | (_, FilterValue::List(_)) => None,
            (FilterValue::Int(a), FilterValue::Int(b)) => Some(a.cmp(b)),
            (FilterValue::Bool(a), FilterValue::Bool(b)) => Some(a.cmp(b)),
            _ => {
                if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
                    return a.partial_cmp(&b);
                }
                if let (Some(a), Some(b)) = (self.as_datetime(), other.as_datetime()) {
                    return Some(a.cmp(&b));
                }
                let a = self.to_param_string()?;
                let b = other.to_param_string()?;
                Some(a.cmp(&b))
            }
        }
    }

    pub fn loosely_equals(&self, other: &FilterValue) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Null => f.write_str("NULL"),
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Int(i) => write!(f, "{}", i),
            FilterValue::Float(x) => write!(f, "{}", x),
            FilterValue::String(s) => write!(f, "{:?}", s),
            FilterValue::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        FilterValue::Int(i)
    }
}

impl From<i32> for FilterValue {
    fn from(i: i32) -> Self {
        FilterValue::Int(i64::from(i))
    }
}

impl From<f64> for FilterValue {
    fn from(f: f64) -> Self {
        FilterValue::Float(f)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(items: Vec<T>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

impl From<serde_json::Value> for FilterValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FilterValue::Null,
            serde_json::Value::Bool(b) => FilterValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FilterValue::Int(i),
                None => n.as_f64().map(FilterValue::Float).unwrap_or(FilterValue::Null),
            },
            serde_json::Value::String(s) => FilterValue::String(s),
            serde_json::Value::Array(items) => {
                FilterValue::List(items.into_iter().map(FilterValue::from).collect())
            }
            // Nested objects have no filter meaning
            serde_json::Value::Object(_) => FilterValue::Null,
        }
    }
}

impl From<&serde_json::Value> for FilterValue {
    fn from(value: &serde_json::Value) -> Self {
        FilterValue::from(value.clone())
    }
}
