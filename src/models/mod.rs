//! Models module for the SDK
//!
//! Typed records produced by validation: the root manifests, the entities
//! declared in property files, and the merged project index.

pub mod column;
pub mod index;
pub mod project;
pub mod properties;
pub mod semantic;

pub use column::ColumnProperties;
pub use index::ProjectIndex;
pub use project::{
    PackageSpec, PackagesManifest, ProjectManifest, SelectorDefinition, SelectorsManifest,
};
pub use properties::{
    AnalysisProperties, ExposureProperties, GroupProperties, MacroProperties, MetricProperties,
    ModelProperties, PROPERTIES_FORMAT_VERSION, Properties, PropertyFile, SeedProperties,
    SnapshotProperties, SourceProperties, SourceTable,
};
pub use semantic::{
    CompositeModel, Dimension, Relationship, SemanticEntity, SemanticMetric, SemanticModel,
};
