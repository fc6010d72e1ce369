use crate::{FilterError, FilterResult, MatchKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PER_PAGE: usize = 15;

/// A filter declared in configuration rather than in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    /// Request key the filter answers to.
    pub attribute: String,
    /// Column to constrain; defaults to the attribute name.
    #[serde(default)]
    pub column: Option<String>,
    #[serde(rename = "match", default)]
    pub kind: MatchKind,
}

impl FilterDefinition {
    pub fn new(attribute: impl Into<String>, kind: MatchKind) -> Self {
        Self {
            attribute: attribute.into(),
            column: None,
            kind,
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn effective_column(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.attribute)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub per_page: Option<usize>,
    #[serde(default)]
    pub filters: Vec<FilterDefinition>,
}

impl FilterConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/scopefilter/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("scopefilter/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("scopefilter\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load the config from the default location, falling back to defaults.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Ignoring config at {}: {}", config_path.display(), e)
                    }
                }
            }
        }
        Self::default()
    }

    /// Load and validate a config file.
    pub fn load_from(path: impl AsRef<Path>) -> FilterResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(
            "Loaded {} filter definitions from {}",
            config.filters.len(),
            path.as_ref().display()
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> FilterResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| FilterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FilterResult<()> {
        if self.per_page == Some(0) {
            return Err(FilterError::Validation(
                "per_page must be greater than zero".to_string(),
            ));
        }
        if let Some(def) = self.filters.iter().find(|d| d.attribute.trim().is_empty()) {
            return Err(FilterError::Validation(format!(
                "filter on column {:?} has an empty attribute name",
                def.column.as_deref().unwrap_or("")
            )));
        }
        Ok(())
    }

    pub fn effective_per_page(&self) -> usize {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }
}
