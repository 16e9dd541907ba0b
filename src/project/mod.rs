//! Project parsing
//!
//! Turns a project tree into a [`ProjectIndex`](crate::models::ProjectIndex):
//! root manifests are read and validated, every model path is walked for
//! property files, and the results are merged by the index builder.

pub mod aggregator;
pub mod builder;
pub mod config;
pub mod error;
pub mod loader;
pub mod root;

pub use aggregator::PropertyAggregator;
pub use builder::ProjectIndexBuilder;
pub use config::{DEFAULT_MAX_DEPTH, ParseConfig, ParseConfigBuilder};
pub use error::ParseError;
pub use loader::ProjectLoader;
pub use root::{
    PACKAGES_MANIFEST_FILE, PROJECT_MANIFEST_FILE, ProjectRoot, SELECTORS_MANIFEST_FILE,
    check_model_paths, resolve_project_root,
};
