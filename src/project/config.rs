//! Configuration for project parsing

use super::error::ParseError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deepest directory level visited below a model path
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Configuration for project parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseConfig {
    /// Maximum directory depth below a model path
    pub max_depth: usize,

    /// File extensions treated as property files, matched case-insensitively
    pub property_extensions: Vec<String>,

    /// Maximum sibling entries of one directory processed at once
    pub max_concurrency: usize,

    /// Flatten composite semantic models once aggregation is complete
    pub resolve_composite_models: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            property_extensions: vec!["yml".to_string(), "yaml".to_string()],
            max_concurrency: 16,
            resolve_composite_models: true,
        }
    }
}

impl ParseConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> ParseConfigBuilder {
        ParseConfigBuilder::default()
    }

    /// Parse a configuration from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ParseError> {
        let config: ParseConfig =
            toml::from_str(content).map_err(|e| ParseError::InvalidConfig(e.to_string()))?;
        config.validated()
    }

    /// Load a configuration file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ParseError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Whether `file_name` carries one of the property-file extensions
    pub fn is_property_file(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.property_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }

    fn validated(mut self) -> Result<Self, ParseError> {
        if self.property_extensions.is_empty() {
            return Err(ParseError::InvalidConfig(
                "propertyExtensions must not be empty".to_string(),
            ));
        }
        for ext in &mut self.property_extensions {
            *ext = ext.trim_start_matches('.').to_string();
        }
        self.max_concurrency = self.max_concurrency.max(1);
        Ok(self)
    }
}

/// Builder for ParseConfig
#[derive(Debug, Default)]
pub struct ParseConfigBuilder {
    config: ParseConfig,
}

impl ParseConfigBuilder {
    /// Set the maximum directory depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Replace the set of property-file extensions
    pub fn property_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.property_extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext: String = ext.into();
                ext.trim_start_matches('.').to_string()
            })
            .collect();
        self
    }

    /// Set the per-directory concurrency limit (at least 1)
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.config.max_concurrency = limit.max(1);
        self
    }

    /// Enable or disable composite model resolution
    pub fn resolve_composite_models(mut self, resolve: bool) -> Self {
        self.config.resolve_composite_models = resolve;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ParseConfig {
        self.config
    }
}
