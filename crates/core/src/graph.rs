// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The user-authored declarative pipeline description, as parsed off disk or
//! received inline over the wire. Immutable once loaded; [`crate::validator::validate_graph`]
//! turns one of these into a [`crate::supergraph::Supergraph`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BrandError;

/// A parsed graph document. `graph_name` is injected from the source file's
/// basename when loading from a path rather than an inline value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphDocument {
    pub graph_name: String,
    pub nodes: Vec<NodeDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivatives: Option<Vec<DerivativeDocument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataDocument>,
}

/// One node entry as authored in the graph document. Unknown fields are preserved
/// verbatim into the published supergraph rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDocument {
    pub nickname: String,
    pub name: String,
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_affinity: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A `{name: spec}` single-key map, as authored under `derivatives:` in the graph
/// document.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DerivativeDocument {
    pub name: String,
    pub spec: Map<String, Value>,
}

impl<'de> Deserialize<'de> for DerivativeDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let mut iter = map.into_iter();
        let (name, spec_value) = iter.next().ok_or_else(|| {
            serde::de::Error::custom("derivative entry must have exactly one key")
        })?;
        if iter.next().is_some() {
            return Err(serde::de::Error::custom(
                "derivative entry must have exactly one key",
            ));
        }
        let spec = match spec_value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "derivative spec for {name} must be a mapping, got {other}"
                )))
            }
        };
        Ok(DerivativeDocument { name, spec })
    }
}

impl DerivativeDocument {
    pub fn script_path(&self) -> Option<&str> {
        self.spec.get("script_path").and_then(Value::as_str)
    }
}

/// Optional metadata used to compute the save path for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetadataDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphDocument {
    /// Parse a graph document from YAML text, injecting `graph_name` from the
    /// source path's basename (the reference behavior for `loadGraph -g file`).
    pub fn from_yaml_file(path: &Path) -> Result<Self, BrandError> {
        let text = std::fs::read_to_string(path).map_err(|_| {
            BrandError::graph(
                format!("Could not find the graph at {}", path.display()),
                path.display().to_string(),
            )
        })?;
        Self::from_yaml_str_with_name(&text, Self::basename(path), path.display().to_string())
    }

    /// Parse a graph document from inline YAML/JSON text (the `loadGraph {graph: ...}`
    /// wire path). `graph_name` must already be present in the document.
    pub fn from_json_value(value: Value, graph_label: impl Into<String>) -> Result<Self, BrandError> {
        serde_json::from_value(value)
            .map_err(|err| BrandError::graph(format!("GraphError: {err}"), graph_label.into()))
    }

    fn from_yaml_str_with_name(
        text: &str,
        name_from_file: String,
        graph_label: String,
    ) -> Result<Self, BrandError> {
        let mut value: Value = serde_yaml::from_str(text)
            .map_err(|err| BrandError::graph(format!("Error parsing graph YAML file: {err}"), graph_label.clone()))?;
        if let Value::Object(ref mut map) = value {
            map.insert("graph_name".to_string(), Value::String(name_from_file));
        }
        serde_json::from_value(value)
            .map_err(|err| BrandError::graph(format!("GraphError: {err}"), graph_label))
    }

    fn basename(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
