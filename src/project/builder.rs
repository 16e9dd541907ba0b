//! Project index accumulator

use super::error::ParseError;
use crate::models::{
    PackagesManifest, ProjectIndex, ProjectManifest, Properties, PropertyFile, SelectorsManifest,
};
use std::sync::{Mutex, MutexGuard};

/// Accumulates manifests and property files into a [`ProjectIndex`]
///
/// The manifest setters take `&mut self` and accept one call each.
/// [`add_property_file`](Self::add_property_file) takes `&self` so concurrent
/// branches of a tree walk can share the builder.
#[derive(Debug, Default)]
pub struct ProjectIndexBuilder {
    project: Option<ProjectManifest>,
    packages: Option<PackagesManifest>,
    selectors: Option<SelectorsManifest>,
    properties: Mutex<Option<Properties>>,
}

fn set_once<T>(slot: &mut Option<T>, value: T, field: &'static str) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::AlreadySet { field });
    }
    *slot = Some(value);
    Ok(())
}

impl ProjectIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_project(&mut self, project: ProjectManifest) -> Result<(), ParseError> {
        set_once(&mut self.project, project, "project")
    }

    pub fn set_packages(&mut self, packages: PackagesManifest) -> Result<(), ParseError> {
        set_once(&mut self.packages, packages, "packages")
    }

    pub fn set_selectors(&mut self, selectors: SelectorsManifest) -> Result<(), ParseError> {
        set_once(&mut self.selectors, selectors, "selectors")
    }

    pub fn project(&self) -> Option<&ProjectManifest> {
        self.project.as_ref()
    }

    /// Append every category sequence of `file` onto the accumulated properties
    pub fn add_property_file(&self, file: PropertyFile) {
        self.lock_properties()
            .get_or_insert_with(Properties::default)
            .append(file);
    }

    /// Number of entities accumulated so far, across all categories
    pub fn entity_count(&self) -> usize {
        self.lock_properties()
            .as_ref()
            .map_or(0, Properties::entity_count)
    }

    /// Finalize the index
    ///
    /// Fails when no project manifest was set or no property file was added.
    pub fn build(self) -> Result<ProjectIndex, ParseError> {
        let properties = self
            .properties
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let project = self.project.ok_or(ParseError::NoProject)?;
        let properties = properties.ok_or(ParseError::NoFiles)?;

        Ok(ProjectIndex {
            project,
            packages: self.packages,
            selectors: self.selectors,
            properties,
        })
    }

    fn lock_properties(&self) -> MutexGuard<'_, Option<Properties>> {
        // A poisoned lock still guards a consistent container
        self.properties
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
