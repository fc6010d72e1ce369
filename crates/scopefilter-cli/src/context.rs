use scopefilter_core::{FilterConfig, FilterError, FilterResult};
use scopefilter_domain::{FilterRegistry, Query, Record};
use std::path::Path;

pub struct CliContext {
    pub config: FilterConfig,
    pub registry: FilterRegistry<Query>,
}

impl CliContext {
    /// Load the given config, or the one in the default location.
    pub fn load(config_path: Option<&Path>) -> FilterResult<Self> {
        let config = match config_path {
            Some(path) => FilterConfig::load_from(path)?,
            None => FilterConfig::load(),
        };
        let registry = FilterRegistry::from_definitions(&config.filters);
        tracing::debug!("Registered filters: {:?}", registry);

        Ok(Self { config, registry })
    }

    /// Read a JSON array of records.
    pub async fn load_records(path: &Path) -> FilterResult<Vec<Record>> {
        let content = tokio::fs::read_to_string(path).await?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        match value {
            serde_json::Value::Array(_) => Ok(serde_json::from_value(value)?),
            _ => Err(FilterError::Validation(format!(
                "{} must contain a JSON array of objects",
                path.display()
            ))),
        }
    }
}
