//! Property files and the entity records they declare

use super::column::ColumnProperties;
use super::semantic::SemanticEntity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Format marker carried by every aggregated property container
pub const PROPERTIES_FORMAT_VERSION: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelProperties {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    #[serde(default, alias = "tests", skip_serializing_if = "Vec::is_empty")]
    pub data_tests: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedProperties {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotProperties {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Table inside a source declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceTable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnProperties>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceProperties {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub tables: Vec<SourceTable>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricProperties {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `simple`, `ratio`, `cumulative`, `derived`, ...
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_params: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExposureProperties {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub exposure_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupProperties {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MacroProperties {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisProperties {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnProperties>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One validated property file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PropertyFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_json::Value>,
    #[serde(default)]
    pub analyses: Vec<AnalysisProperties>,
    #[serde(default)]
    pub exposures: Vec<ExposureProperties>,
    #[serde(default)]
    pub groups: Vec<GroupProperties>,
    #[serde(default)]
    pub macros: Vec<MacroProperties>,
    #[serde(default)]
    pub metrics: Vec<MetricProperties>,
    #[serde(default)]
    pub models: Vec<ModelProperties>,
    #[serde(default)]
    pub seeds: Vec<SeedProperties>,
    #[serde(default)]
    pub snapshots: Vec<SnapshotProperties>,
    #[serde(default)]
    pub sources: Vec<SourceProperties>,
    #[serde(default)]
    pub semantic_models: Vec<SemanticEntity>,
}

impl PropertyFile {
    /// Total number of entities declared across all categories
    pub fn entity_count(&self) -> usize {
        self.analyses.len()
            + self.exposures.len()
            + self.groups.len()
            + self.macros.len()
            + self.metrics.len()
            + self.models.len()
            + self.seeds.len()
            + self.snapshots.len()
            + self.sources.len()
            + self.semantic_models.len()
    }
}

/// Aggregate of every property file in a project
///
/// Sequences only ever grow: [`Properties::append`] concatenates, it never
/// replaces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Properties {
    pub version: u32,
    pub analyses: Vec<AnalysisProperties>,
    pub exposures: Vec<ExposureProperties>,
    pub groups: Vec<GroupProperties>,
    pub macros: Vec<MacroProperties>,
    pub metrics: Vec<MetricProperties>,
    pub models: Vec<ModelProperties>,
    pub seeds: Vec<SeedProperties>,
    pub snapshots: Vec<SnapshotProperties>,
    pub sources: Vec<SourceProperties>,
    pub semantic_models: Vec<SemanticEntity>,
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            version: PROPERTIES_FORMAT_VERSION,
            analyses: Vec::new(),
            exposures: Vec::new(),
            groups: Vec::new(),
            macros: Vec::new(),
            metrics: Vec::new(),
            models: Vec::new(),
            seeds: Vec::new(),
            snapshots: Vec::new(),
            sources: Vec::new(),
            semantic_models: Vec::new(),
        }
    }
}

impl Properties {
    /// Total number of entities accumulated across all categories
    pub fn entity_count(&self) -> usize {
        self.analyses.len()
            + self.exposures.len()
            + self.groups.len()
            + self.macros.len()
            + self.metrics.len()
            + self.models.len()
            + self.seeds.len()
            + self.snapshots.len()
            + self.sources.len()
            + self.semantic_models.len()
    }

    /// Append every category sequence of `file`, preserving order.
    ///
    /// The file's own `version` is a scalar and is not merged.
    pub fn append(&mut self, file: PropertyFile) {
        let PropertyFile {
            version: _,
            analyses,
            exposures,
            groups,
            macros,
            metrics,
            models,
            seeds,
            snapshots,
            sources,
            semantic_models,
        } = file;

        self.analyses.extend(analyses);
        self.exposures.extend(exposures);
        self.groups.extend(groups);
        self.macros.extend(macros);
        self.metrics.extend(metrics);
        self.models.extend(models);
        self.seeds.extend(seeds);
        self.snapshots.extend(snapshots);
        self.sources.extend(sources);
        self.semantic_models.extend(semantic_models);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str) -> ModelProperties {
        serde_json::from_value(serde_json::json!({ "name": name })).unwrap()
    }

    #[test]
    fn test_append_preserves_order_and_marker() {
        let mut properties = Properties::default();
        properties.append(PropertyFile {
            version: Some(serde_json::json!(7)),
            models: vec![model("stg_orders"), model("stg_customers")],
            ..Default::default()
        });
        properties.append(PropertyFile {
            models: vec![model("orders")],
            ..Default::default()
        });

        let names: Vec<_> = properties.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["stg_orders", "stg_customers", "orders"]);
        assert_eq!(properties.version, PROPERTIES_FORMAT_VERSION);
        assert!(properties.sources.is_empty());
    }

    #[test]
    fn test_unknown_attributes_are_kept() {
        let model: ModelProperties = serde_json::from_value(serde_json::json!({
            "name": "orders",
            "access": "public",
            "columns": [{ "name": "id", "tests": ["unique"] }]
        }))
        .unwrap();

        assert_eq!(model.extra.get("access"), Some(&serde_json::json!("public")));
        assert_eq!(model.columns[0].data_tests, vec![serde_json::json!("unique")]);
    }
}
