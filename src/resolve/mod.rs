//! Post-aggregation resolution passes
//!
//! These passes need the complete entity set, so they run only after every
//! property file has been merged.

pub mod composite;

pub use composite::{flatten_composite, resolve_composite_models};

/// Error during composite model resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Composite model '{composite}' references unknown model '{unique_name}'")]
    MissingModel {
        composite: String,
        unique_name: String,
    },
    #[error("Composite model '{composite}' references composite '{unique_name}' which is not yet flattened")]
    UnresolvedComposite {
        composite: String,
        unique_name: String,
    },
    #[error("Composite model '{unique_name}' is part of a reference cycle")]
    CircularReference { unique_name: String },
}
