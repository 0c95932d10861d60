// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The materialized, validated, hash-annotated graph published to
//! `supergraph_stream`. Owned by the coordinator; every other component treats it
//! as read-only, observed via the stream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::node::{DerivativeSpec, ResolvedNode};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supergraph {
    pub redis_host: String,
    pub redis_port: u16,
    pub brand_hash: String,
    pub graph_name: String,
    pub graph_loaded_ts: u64,
    pub nodes: BTreeMap<String, ResolvedNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivatives: Option<BTreeMap<String, DerivativeSpec>>,
}

impl Supergraph {
    /// Nodes assigned to `self_machine` (or to no machine at all, meaning
    /// "wherever the coordinator runs").
    pub fn local_nodes(&self, self_machine: Option<&str>) -> impl Iterator<Item = &ResolvedNode> {
        self.nodes
            .values()
            .filter(move |n| n.targets(self_machine))
    }

    /// Serialize to the `{"data": "<json>"}` envelope written to
    /// `supergraph_stream`.
    pub fn to_stream_payload(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut payload = Map::new();
        payload.insert("data".to_string(), Value::String(serde_json::to_string(self)?));
        Ok(payload)
    }

    /// Parse the `{"data": "<json>"}` envelope read back from `supergraph_stream`.
    pub fn from_stream_payload(fields: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let data = fields
            .get("data")
            .and_then(Value::as_str)
            .unwrap_or_default();
        serde_json::from_str(data)
    }

    /// Apply a validated set of per-nickname parameter updates, returning a new
    /// supergraph that differs from `self` only in the specified
    /// `nodes[nickname].parameters` keys.
    pub fn with_updated_parameters(
        &self,
        updates: &BTreeMap<String, Map<String, Value>>,
    ) -> Self {
        let mut next = self.clone();
        for (nickname, params) in updates {
            if let Some(node) = next.nodes.get_mut(nickname) {
                for (key, value) in params {
                    node.parameters.insert(key.clone(), value.clone());
                }
            }
        }
        next
    }
}

#[cfg(test)]
#[path = "supergraph_tests.rs"]
mod tests;
