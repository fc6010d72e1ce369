use scopefilter_core::FilterValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A row of data the in-memory query can be evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// Look up a column. Dotted names reach into nested objects.
    pub fn get(&self, column: &str) -> Option<FilterValue> {
        let mut parts = column.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(FilterValue::from(current)).filter(|value| !value.is_null())
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_nested() {
        let record: Record =
            serde_json::from_value(json!({"name": "Jo", "address": {"city": "Oslo"}})).unwrap();

        assert_eq!(record.get("name"), Some(FilterValue::from("Jo")));
        assert_eq!(record.get("address.city"), Some(FilterValue::from("Oslo")));
        assert_eq!(record.get("address.zip"), None);
        assert_eq!(record.get("name.first"), None);
    }

    #[test]
    fn test_null_is_missing() {
        let record = Record::new().with("email", Value::Null);
        assert_eq!(record.get("email"), None);
    }
}
