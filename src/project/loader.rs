//! Project loading functionality
//!
//! Runs the whole pipeline over a storage backend: root manifests, model-path
//! checks, property aggregation, finalization and composite resolution.

use super::aggregator::PropertyAggregator;
use super::builder::ProjectIndexBuilder;
use super::config::ParseConfig;
use super::error::ParseError;
use super::root::{check_model_paths, resolve_project_root};
use crate::models::ProjectIndex;
use crate::storage::StorageBackend;
use crate::validation::{DefaultSchemaValidator, SchemaValidator};
use futures::future::try_join_all;
use tracing::info;

/// Project loader that uses a storage backend
pub struct ProjectLoader<B: StorageBackend> {
    storage: B,
    validator: Box<dyn SchemaValidator>,
    config: ParseConfig,
}

impl<B: StorageBackend> ProjectLoader<B> {
    /// Create a new project loader with the given storage backend
    pub fn new(storage: B) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultSchemaValidator),
            config: ParseConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParseConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the schema validator used for every file
    pub fn with_validator(mut self, validator: impl SchemaValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Load the project rooted at the backend's base path
    pub async fn load(&self) -> Result<ProjectIndex, ParseError> {
        let root = resolve_project_root(&self.storage, &*self.validator, "").await?;
        check_model_paths(&root.project.model_paths, &root.directories)?;

        let model_paths = root.project.model_paths.clone();
        let mut builder = ProjectIndexBuilder::new();
        builder.set_project(root.project)?;
        if let Some(packages) = root.packages {
            builder.set_packages(packages)?;
        }
        if let Some(selectors) = root.selectors {
            builder.set_selectors(selectors)?;
        }

        let aggregator =
            PropertyAggregator::new(&self.storage, &*self.validator, &self.config);
        try_join_all(
            model_paths
                .iter()
                .map(|path| aggregator.aggregate(path, &builder)),
        )
        .await?;

        let mut index = builder.build()?;
        info!(
            project = %index.project.name,
            model_paths = model_paths.len(),
            entities = index.properties.entity_count(),
            "Built project index"
        );

        if self.config.resolve_composite_models && index.has_composite_models() {
            index.resolve_composite_models()?;
        }
        Ok(index)
    }
}
