//! Composite model flattening
//!
//! A composite model names other models; resolving it produces a regular model
//! whose metrics, dimensions and relationships are the concatenation of its
//! own metrics and those of the referenced models, in listed order. Overrides
//! are merged so that later models win on conflicting keys.

use super::ResolveError;
use crate::models::{CompositeModel, SemanticEntity, SemanticModel};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Resolve every composite model in `entities`.
///
/// Regular models pass through unchanged and every entity keeps its position.
/// Each composite is flattened from its own list of references. A reference
/// names the first entity carrying that unique name; when that entity is a
/// composite it is flattened first and contributes its flattened attributes.
pub fn resolve_composite_models(
    entities: &[SemanticEntity],
) -> Result<Vec<SemanticEntity>, ResolveError> {
    let by_name = first_by_name(entities);
    let order = composite_order(entities, &by_name)?;

    let mut resolved: HashMap<usize, SemanticModel> = HashMap::new();
    for position in order {
        let SemanticEntity::Composite(composite) = &entities[position] else {
            continue;
        };
        let model = flatten_with(composite, |name| {
            let target = *by_name.get(name)?;
            match &entities[target] {
                SemanticEntity::Model(model) => Some(model),
                SemanticEntity::Composite(_) => resolved.get(&target),
            }
        })?;
        debug!(
            unique_name = %composite.unique_name,
            inner_models = composite.models.len(),
            "Resolved composite model"
        );
        resolved.insert(position, model);
    }

    Ok(entities
        .iter()
        .enumerate()
        .map(|(position, entity)| match resolved.remove(&position) {
            Some(model) => SemanticEntity::Model(model),
            None => entity.clone(),
        })
        .collect())
}

/// Flatten a single composite whose references are all regular models.
///
/// A reference to another composite fails with
/// [`ResolveError::UnresolvedComposite`]; [`resolve_composite_models`]
/// handles nesting.
pub fn flatten_composite(
    composite: &CompositeModel,
    entities: &[SemanticEntity],
) -> Result<SemanticModel, ResolveError> {
    let by_name = first_by_name(entities);
    for name in &composite.models {
        if let Some(&target) = by_name.get(name.as_str())
            && entities[target].is_composite()
        {
            return Err(ResolveError::UnresolvedComposite {
                composite: composite.unique_name.clone(),
                unique_name: name.clone(),
            });
        }
    }

    flatten_with(composite, |name| match &entities[*by_name.get(name)?] {
        SemanticEntity::Model(model) => Some(model),
        SemanticEntity::Composite(_) => None,
    })
}

/// Position of the first entity carrying each unique name
fn first_by_name(entities: &[SemanticEntity]) -> HashMap<&str, usize> {
    let mut by_name = HashMap::new();
    for (position, entity) in entities.iter().enumerate() {
        by_name.entry(entity.unique_name()).or_insert(position);
    }
    by_name
}

fn flatten_with<'a, F>(composite: &CompositeModel, lookup: F) -> Result<SemanticModel, ResolveError>
where
    F: Fn(&str) -> Option<&'a SemanticModel>,
{
    let mut metrics = composite.metrics.clone().unwrap_or_default();
    let mut dimensions = Vec::new();
    let mut relationships = Vec::new();
    let mut overrides = BTreeMap::new();

    for name in &composite.models {
        let inner = lookup(name).ok_or_else(|| ResolveError::MissingModel {
            composite: composite.unique_name.clone(),
            unique_name: name.clone(),
        })?;

        metrics.extend(inner.metrics.iter().cloned());
        if let Some(inner_dimensions) = &inner.dimensions {
            dimensions.extend(inner_dimensions.iter().cloned());
        }
        relationships.extend(inner.relationships.iter().cloned());
        if let Some(inner_overrides) = &inner.overrides {
            overrides.extend(inner_overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }

    Ok(SemanticModel {
        label: composite.label.clone(),
        unique_name: composite.unique_name.clone(),
        metrics,
        dimensions: (!dimensions.is_empty()).then_some(dimensions),
        relationships,
        overrides: (!overrides.is_empty()).then_some(overrides),
    })
}

/// Order composite positions so that every composite comes after the
/// composites it references.
fn composite_order(
    entities: &[SemanticEntity],
    by_name: &HashMap<&str, usize>,
) -> Result<Vec<usize>, ResolveError> {
    let mut graph = DiGraph::<usize, ()>::new();
    let mut nodes: HashMap<usize, NodeIndex> = HashMap::new();

    // Nodes are added in entity order so the sort, and the first error reported, are stable.
    for (position, entity) in entities.iter().enumerate() {
        if entity.is_composite() {
            nodes.insert(position, graph.add_node(position));
        }
    }

    for node in graph.node_indices() {
        let SemanticEntity::Composite(composite) = &entities[graph[node]] else {
            continue;
        };
        for inner in &composite.models {
            if let Some(target) = by_name.get(inner.as_str())
                && let Some(&inner_node) = nodes.get(target)
            {
                graph.add_edge(inner_node, node, ());
            }
        }
    }

    let sorted = toposort(&graph, None).map_err(|cycle| ResolveError::CircularReference {
        unique_name: entities[graph[cycle.node_id()]].unique_name().to_string(),
    })?;

    Ok(sorted.into_iter().map(|node| graph[node]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dimension, Relationship, SemanticMetric};
    use serde_json::json;

    fn metric(name: &str) -> SemanticMetric {
        SemanticMetric {
            name: name.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    fn dimension(name: &str) -> Dimension {
        Dimension {
            name: name.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    fn model(name: &str, metrics: &[&str], dimensions: &[&str]) -> SemanticModel {
        SemanticModel {
            label: name.to_uppercase(),
            unique_name: name.to_string(),
            metrics: metrics.iter().map(|m| metric(m)).collect(),
            dimensions: Some(dimensions.iter().map(|d| dimension(d)).collect()),
            relationships: vec![],
            overrides: None,
        }
    }

    fn composite(name: &str, models: &[&str]) -> CompositeModel {
        CompositeModel {
            label: name.to_uppercase(),
            unique_name: name.to_string(),
            metrics: None,
            models: models.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_flatten_keeps_own_metrics_first() {
        let mut c = composite("m", &["a"]);
        c.metrics = Some(vec![metric("own")]);
        let entities = vec![SemanticEntity::Model(model("a", &["m1"], &[]))];

        let flat = flatten_composite(&c, &entities).unwrap();
        let names: Vec<_> = flat.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["own", "m1"]);
        assert!(flat.dimensions.is_none());
        assert!(flat.overrides.is_none());
    }

    #[test]
    fn test_relationships_concatenate() {
        let mut a = model("a", &[], &[]);
        a.relationships = vec![Relationship {
            target_model: "customers".to_string(),
            attributes: BTreeMap::from([("join_type".to_string(), json!("left"))]),
        }];
        let mut b = model("b", &[], &[]);
        b.relationships = vec![Relationship {
            target_model: "stores".to_string(),
            attributes: BTreeMap::new(),
        }];
        let entities = vec![a.into(), b.into()];

        let flat = flatten_composite(&composite("m", &["a", "b"]), &entities).unwrap();
        let targets: Vec<_> = flat
            .relationships
            .iter()
            .map(|r| r.target_model.as_str())
            .collect();
        assert_eq!(targets, vec!["customers", "stores"]);
    }

    #[test]
    fn test_nested_composites_resolve_in_dependency_order() {
        let entities = vec![
            composite("outer", &["inner", "c"]).into(),
            composite("inner", &["a", "b"]).into(),
            model("a", &["m1"], &["d1"]).into(),
            model("b", &["m2"], &[]).into(),
            model("c", &["m3"], &["d3"]).into(),
        ];

        let resolved = resolve_composite_models(&entities).unwrap();
        assert!(resolved.iter().all(|e| !e.is_composite()));

        let SemanticEntity::Model(outer) = &resolved[0] else {
            panic!("outer should be resolved");
        };
        let metrics: Vec<_> = outer.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(metrics, vec!["m1", "m2", "m3"]);
        let dims: Vec<_> = outer
            .dimensions
            .as_ref()
            .unwrap()
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(dims, vec!["d1", "d3"]);
    }

    #[test]
    fn test_reference_cycle_is_rejected() {
        let entities = vec![
            composite("x", &["y"]).into(),
            composite("y", &["x"]).into(),
        ];

        let err = resolve_composite_models(&entities).unwrap_err();
        assert!(matches!(err, ResolveError::CircularReference { .. }));
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let entities = vec![composite("x", &["x"]).into()];

        let err = resolve_composite_models(&entities).unwrap_err();
        assert_eq!(
            err,
            ResolveError::CircularReference {
                unique_name: "x".to_string()
            }
        );
    }

    #[test]
    fn test_composite_after_model_with_same_name_is_resolved() {
        let entities = vec![
            model("x", &["mx"], &[]).into(),
            composite("x", &["a"]).into(),
            model("a", &["m1"], &[]).into(),
        ];

        let resolved = resolve_composite_models(&entities).unwrap();
        assert!(resolved.iter().all(|e| !e.is_composite()));
        assert_eq!(resolved[0], entities[0]);

        let SemanticEntity::Model(second) = &resolved[1] else {
            panic!("composite should be flattened");
        };
        assert_eq!(second.label, "X");
        assert_eq!(second.metrics, vec![metric("m1")]);
    }

    #[test]
    fn test_composites_sharing_a_name_keep_their_own_references() {
        let mut first = composite("c", &["a"]);
        first.label = "C1".to_string();
        let mut second = composite("c", &["b"]);
        second.label = "C2".to_string();
        let entities = vec![
            model("a", &["m1"], &[]).into(),
            model("b", &["m2"], &[]).into(),
            first.into(),
            second.into(),
        ];

        let resolved = resolve_composite_models(&entities).unwrap();
        let SemanticEntity::Model(c1) = &resolved[2] else {
            panic!("first composite should be flattened");
        };
        let SemanticEntity::Model(c2) = &resolved[3] else {
            panic!("second composite should be flattened");
        };
        assert_eq!(c1.label, "C1");
        assert_eq!(c1.metrics, vec![metric("m1")]);
        assert_eq!(c2.label, "C2");
        assert_eq!(c2.metrics, vec![metric("m2")]);
    }

    #[test]
    fn test_flatten_rejects_composite_reference() {
        let entities = vec![
            composite("inner", &["a"]).into(),
            model("a", &["m1"], &[]).into(),
        ];

        let err = flatten_composite(&composite("outer", &["inner"]), &entities).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnresolvedComposite {
                composite: "outer".to_string(),
                unique_name: "inner".to_string(),
            }
        );

        let err = flatten_composite(&composite("outer", &["ghost"]), &entities).unwrap_err();
        assert!(matches!(err, ResolveError::MissingModel { .. }));
    }
}
