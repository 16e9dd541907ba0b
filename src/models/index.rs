//! The merged project index

use super::project::{PackagesManifest, ProjectManifest, SelectorsManifest};
use super::properties::Properties;
use crate::resolve::{ResolveError, resolve_composite_models};
use serde::{Deserialize, Serialize};

/// Complete, validated and merged representation of one project tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectIndex {
    pub project: ProjectManifest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<PackagesManifest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectors: Option<SelectorsManifest>,
    pub properties: Properties,
}

impl ProjectIndex {
    /// Replace every composite semantic model with its flattened equivalent.
    ///
    /// On error the index is left unchanged.
    pub fn resolve_composite_models(&mut self) -> Result<(), ResolveError> {
        let resolved = resolve_composite_models(&self.properties.semantic_models)?;
        self.properties.semantic_models = resolved;
        Ok(())
    }

    pub fn has_composite_models(&self) -> bool {
        self.properties
            .semantic_models
            .iter()
            .any(|entity| entity.is_composite())
    }
}
