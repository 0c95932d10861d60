// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolved node and derivative entries, as they appear inside a published
//! [`crate::supergraph::Supergraph`] — a [`crate::graph::NodeDocument`] plus the
//! coordinator-computed `binary` path and reconciled `git_hash`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node spec as resolved into the supergraph: the authored fields plus the
/// absolute binary path and the git hash recorded at publish time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedNode {
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
    /// Absolute path to the compiled node executable.
    pub binary: String,
    /// Git hash recorded next to the binary at validation time. Empty when no
    /// sidecar hash file was found.
    #[serde(default)]
    pub git_hash: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResolvedNode {
    /// Whether this node is assigned to `self_machine` (empty/absent `machine`
    /// means "runs on whichever process hosts the coordinator").
    pub fn targets(&self, self_machine: Option<&str>) -> bool {
        match (&self.machine, self_machine) {
            (None, _) => true,
            (Some(m), Some(me)) => m == me,
            (Some(_), None) => false,
        }
    }
}

/// A derivative entry as resolved into the supergraph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivativeSpec {
    #[serde(default)]
    pub git_hash: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DerivativeSpec {
    pub fn script_path(&self) -> Option<&str> {
        self.extra.get("script_path").and_then(Value::as_str)
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
