//! Column model for the SDK

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column declared on a model, seed, snapshot or source table
///
/// # Example
///
/// ```rust
/// use project_index_sdk::models::ColumnProperties;
///
/// let column = ColumnProperties::new("customer_id");
/// assert!(column.data_tests.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnProperties {
    /// Column name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared warehouse type, when the column is part of a contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Generic tests attached to the column (`unique`, `not_null`, ...)
    #[serde(default, alias = "tests", skip_serializing_if = "Vec::is_empty")]
    pub data_tests: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ColumnProperties {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            data_type: None,
            data_tests: Vec::new(),
            constraints: Vec::new(),
            tags: Vec::new(),
            meta: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }
}
