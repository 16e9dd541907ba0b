//! Semantic-layer entities: regular models and composite models

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticMetric {
    pub name: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dimension {
    pub name: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

/// Join from the owning model to another model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub target_model: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

/// Regular semantic model
///
/// `dimensions` and `overrides` are `None` rather than empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticModel {
    pub label: String,
    pub unique_name: String,
    #[serde(default)]
    pub metrics: Vec<SemanticMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<Dimension>>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<BTreeMap<String, serde_json::Value>>,
}

/// Model defined as the combination of other models, referenced by unique name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositeModel {
    pub label: String,
    pub unique_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<SemanticMetric>>,
    pub models: Vec<String>,
}

/// Entity listed under `semantic_models`.
///
/// Classified once when decoded: a document carrying a `models` key is a
/// composite and must decode as one, anything else is a regular model.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SemanticEntity {
    Composite(CompositeModel),
    Model(SemanticModel),
}

impl<'de> Deserialize<'de> for SemanticEntity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let entity = if value.get("models").is_some_and(|models| !models.is_null()) {
            serde_json::from_value(value).map(SemanticEntity::Composite)
        } else {
            serde_json::from_value(value).map(SemanticEntity::Model)
        };
        entity.map_err(D::Error::custom)
    }
}

impl SemanticEntity {
    pub fn unique_name(&self) -> &str {
        match self {
            SemanticEntity::Composite(c) => &c.unique_name,
            SemanticEntity::Model(m) => &m.unique_name,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, SemanticEntity::Composite(_))
    }
}

impl From<SemanticModel> for SemanticEntity {
    fn from(model: SemanticModel) -> Self {
        SemanticEntity::Model(model)
    }
}

impl From<CompositeModel> for SemanticEntity {
    fn from(model: CompositeModel) -> Self {
        SemanticEntity::Composite(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_models_list_classifies_as_composite() {
        let entity: SemanticEntity = serde_json::from_value(json!({
            "label": "Sales",
            "unique_name": "sales",
            "models": ["orders", "customers"]
        }))
        .unwrap();

        assert!(entity.is_composite());
        assert_eq!(entity.unique_name(), "sales");
    }

    #[test]
    fn test_regular_model_without_models_list() {
        let entity: SemanticEntity = serde_json::from_value(json!({
            "label": "Orders",
            "unique_name": "orders",
            "metrics": [{ "name": "order_count", "sql": "count(*)" }],
            "dimensions": [{ "name": "status" }]
        }))
        .unwrap();

        let SemanticEntity::Model(model) = entity else {
            panic!("expected a regular model");
        };
        assert_eq!(model.metrics[0].attributes.get("sql"), Some(&json!("count(*)")));
        assert_eq!(model.dimensions.map(|d| d.len()), Some(1));
        assert!(model.overrides.is_none());
    }

    #[test]
    fn test_absent_collections_are_not_serialized() {
        let model = SemanticModel {
            label: "Orders".to_string(),
            unique_name: "orders".to_string(),
            metrics: vec![],
            dimensions: None,
            relationships: vec![],
            overrides: None,
        };

        let value = serde_json::to_value(&model).unwrap();
        assert!(value.get("dimensions").is_none());
        assert!(value.get("overrides").is_none());
    }

    #[test]
    fn test_malformed_models_list_is_not_a_regular_model() {
        let result = serde_json::from_value::<SemanticEntity>(json!({
            "label": "Sales",
            "unique_name": "sales",
            "models": ["orders", 3]
        }));
        assert!(result.is_err());
    }
}
