//! Recursive property-file aggregation
//!
//! Walks a model-path subtree and feeds every property file into a
//! [`ProjectIndexBuilder`]. Sibling files and sibling directories are processed
//! concurrently; the first failure aborts the walk.

use super::builder::ProjectIndexBuilder;
use super::config::ParseConfig;
use super::error::ParseError;
use super::root::{read_yaml, with_path};
use crate::storage::{StorageBackend, join_path};
use crate::validation::{SchemaValidator, validate_property_file};
use futures::future::{self, LocalBoxFuture};
use futures::{FutureExt, StreamExt, TryStreamExt, stream};
use tracing::{debug, trace};

/// Walks directories and merges their property files
pub struct PropertyAggregator<'a, B: StorageBackend + ?Sized> {
    storage: &'a B,
    validator: &'a dyn SchemaValidator,
    config: &'a ParseConfig,
}

impl<'a, B: StorageBackend + ?Sized> PropertyAggregator<'a, B> {
    pub fn new(storage: &'a B, validator: &'a dyn SchemaValidator, config: &'a ParseConfig) -> Self {
        Self {
            storage,
            validator,
            config,
        }
    }

    /// Merge every property file under `dir` into `builder`
    pub async fn aggregate(
        &self,
        dir: &str,
        builder: &ProjectIndexBuilder,
    ) -> Result<(), ParseError> {
        self.visit(dir.to_string(), 0, builder).await
    }

    fn visit<'s>(
        &'s self,
        dir: String,
        depth: usize,
        builder: &'s ProjectIndexBuilder,
    ) -> LocalBoxFuture<'s, Result<(), ParseError>> {
        async move {
            if depth > self.config.max_depth {
                return Err(ParseError::MaxDepthExceeded {
                    directory: dir,
                    depth,
                });
            }

            let listing = self.storage.list_dir(&dir).await?;

            let mut tasks: Vec<LocalBoxFuture<'s, Result<(), ParseError>>> = Vec::new();
            for file in listing.files {
                if !self.config.is_property_file(&file) {
                    trace!(file = %file, directory = %dir, "Ignoring non-property file");
                    continue;
                }
                let path = join_path(&dir, &file);
                tasks.push(self.load_file(path, builder).boxed_local());
            }
            for sub in listing.directories {
                tasks.push(self.visit(join_path(&dir, &sub), depth + 1, builder));
            }

            stream::iter(tasks)
                .buffer_unordered(self.config.max_concurrency.max(1))
                .try_for_each(|()| future::ok(()))
                .await
        }
        .boxed_local()
    }

    async fn load_file(&self, path: String, builder: &ProjectIndexBuilder) -> Result<(), ParseError> {
        let document = read_yaml(self.storage, &path).await?;
        let file = validate_property_file(self.validator, &document)
            .map_err(|failure| with_path(&path, failure))?;
        debug!(path = %path, entities = file.entity_count(), "Merged property file");
        builder.add_property_file(file);
        Ok(())
    }
}
