//! Project Index SDK - Parses data-modelling project trees
//!
//! Provides:
//! - Storage backends for reading a project tree
//! - Schema validation of manifests and property files
//! - Recursive aggregation of property files into a merged project index
//! - Resolution of composite semantic models into flattened models

pub mod models;
pub mod project;
pub mod resolve;
pub mod storage;
pub mod validation;

// Re-export commonly used types
#[cfg(feature = "native-fs")]
pub use storage::filesystem::FileSystemStorageBackend;
pub use storage::{DirectoryListing, StorageBackend, StorageError};

pub use project::{
    ParseConfig, ParseError, ProjectIndexBuilder, ProjectLoader, PropertyAggregator,
    check_model_paths, resolve_project_root,
};
pub use resolve::{ResolveError, resolve_composite_models};
pub use validation::{
    DefaultSchemaValidator, SchemaCategory, SchemaValidator, ValidatedDocument, ValidationFailure,
    ValidationIssue,
};

// Re-export models
pub use models::{
    CompositeModel, ProjectIndex, ProjectManifest, Properties, PropertyFile, SemanticEntity,
    SemanticModel,
};
