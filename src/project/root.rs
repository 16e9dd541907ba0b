//! Project root resolution
//!
//! Reads the singleton manifests at the root of a project and checks that the
//! configured model paths exist.

use super::error::ParseError;
use crate::models::{PackagesManifest, ProjectManifest, SelectorsManifest};
use crate::storage::{StorageBackend, join_path};
use crate::validation::{
    SchemaValidator, ValidationFailure, validate_packages, validate_project, validate_selectors,
};
use tracing::info;

pub const PROJECT_MANIFEST_FILE: &str = "dbt_project.yml";
pub const PACKAGES_MANIFEST_FILE: &str = "packages.yml";
pub const SELECTORS_MANIFEST_FILE: &str = "selectors.yml";

/// Manifests found at the project root, plus its immediate subdirectories
#[derive(Debug, Clone)]
pub struct ProjectRoot {
    pub project: ProjectManifest,
    pub packages: Option<PackagesManifest>,
    pub selectors: Option<SelectorsManifest>,
    pub directories: Vec<String>,
}

/// Read and validate the manifests in `root`.
///
/// The project manifest is required; the package and selector manifests are
/// read only when present. File names match exactly.
pub async fn resolve_project_root<B: StorageBackend + ?Sized>(
    storage: &B,
    validator: &dyn SchemaValidator,
    root: &str,
) -> Result<ProjectRoot, ParseError> {
    let listing = storage.list_dir(root).await?;

    if !listing.has_file(PROJECT_MANIFEST_FILE) {
        return Err(ParseError::ManifestNotFound {
            file: PROJECT_MANIFEST_FILE.to_string(),
        });
    }

    let path = join_path(root, PROJECT_MANIFEST_FILE);
    let project = validate_project(validator, &read_yaml(storage, &path).await?)
        .map_err(|failure| with_path(&path, failure))?;
    info!(project = %project.name, "Loaded project manifest");

    let packages = if listing.has_file(PACKAGES_MANIFEST_FILE) {
        let path = join_path(root, PACKAGES_MANIFEST_FILE);
        let packages = validate_packages(validator, &read_yaml(storage, &path).await?)
            .map_err(|failure| with_path(&path, failure))?;
        info!(count = packages.packages.len(), "Loaded package manifest");
        Some(packages)
    } else {
        None
    };

    let selectors = if listing.has_file(SELECTORS_MANIFEST_FILE) {
        let path = join_path(root, SELECTORS_MANIFEST_FILE);
        let selectors = validate_selectors(validator, &read_yaml(storage, &path).await?)
            .map_err(|failure| with_path(&path, failure))?;
        info!(count = selectors.selectors.len(), "Loaded selector manifest");
        Some(selectors)
    } else {
        None
    };

    Ok(ProjectRoot {
        project,
        packages,
        selectors,
        directories: listing.directories,
    })
}

/// Check every model path against the root's immediate subdirectories.
///
/// A model path must be a single folder name and must exist.
pub fn check_model_paths(model_paths: &[String], directories: &[String]) -> Result<(), ParseError> {
    for path in model_paths {
        if path.contains('/') || path.contains('\\') {
            return Err(ParseError::NestedModelPath(path.clone()));
        }
        if !directories.iter().any(|dir| dir == path) {
            return Err(ParseError::ModelPathNotFound(path.clone()));
        }
    }
    Ok(())
}

/// Read a file and decode it as YAML into a generic document.
pub(crate) async fn read_yaml<B: StorageBackend + ?Sized>(
    storage: &B,
    path: &str,
) -> Result<serde_json::Value, ParseError> {
    let content = storage.read_file(path).await?;
    let text = String::from_utf8(content).map_err(|e| ParseError::Decode {
        path: path.to_string(),
        message: format!("Invalid UTF-8: {}", e),
    })?;
    serde_yaml::from_str(&text).map_err(|e| ParseError::Decode {
        path: path.to_string(),
        message: format!("Failed to parse YAML: {}", e),
    })
}

pub(crate) fn with_path(path: &str, failure: ValidationFailure) -> ParseError {
    ParseError::Validation {
        path: path.to_string(),
        failure,
    }
}
