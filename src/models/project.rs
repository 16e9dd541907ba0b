//! Root manifests: project, packages and selectors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_model_paths() -> Vec<String> {
    vec!["models".to_string()]
}

/// Validated project manifest (`dbt_project.yml`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectManifest {
    pub name: String,
    /// Project version; YAML allows both `1.0.0` and `1.0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Folders searched for models and their property files
    #[serde(default = "default_model_paths")]
    pub model_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seed_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub macro_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snapshot_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub analysis_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, serde_json::Value>,
    /// Folder-level model configuration, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeds: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProjectManifest {
    /// Minimal manifest with default paths.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            config_version: None,
            profile: None,
            model_paths: default_model_paths(),
            seed_paths: Vec::new(),
            macro_paths: Vec::new(),
            snapshot_paths: Vec::new(),
            analysis_paths: Vec::new(),
            test_paths: Vec::new(),
            target_path: None,
            vars: BTreeMap::new(),
            models: None,
            seeds: None,
            extra: BTreeMap::new(),
        }
    }
}

/// One installable package entry in `packages.yml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageSpec {
    /// Hub package name, e.g. `dbt-labs/dbt_utils`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Validated package manifest (`packages.yml`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PackagesManifest {
    #[serde(default)]
    pub packages: Vec<PackageSpec>,
}

/// Named node selection in `selectors.yml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectorDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Selection expression, either a string or a nested method/union tree
    pub definition: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

/// Validated selector manifest (`selectors.yml`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SelectorsManifest {
    #[serde(default)]
    pub selectors: Vec<SelectorDefinition>,
}
