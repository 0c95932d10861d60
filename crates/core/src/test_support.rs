// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`. This module is
//! test-only regardless of which crate pulls it in via the `test-support`
//! feature, so the workspace's `expect_used` lint is relaxed here rather than
//! via `cfg_attr(test, ...)`, which wouldn't cover a downstream crate's build.
#![allow(clippy::expect_used)]

use std::path::Path;

use serde_json::{Map, Value};

use crate::graph::{GraphDocument, NodeDocument};
use crate::hash::VcsQuery;

/// A node document with sensible test defaults.
pub fn node_doc(nickname: &str, name: &str, module: &str) -> NodeDocument {
    NodeDocument {
        nickname: nickname.to_string(),
        name: name.to_string(),
        module: module.to_string(),
        machine: None,
        run_priority: None,
        cpu_affinity: None,
        parameters: Map::new(),
        extra: Map::new(),
    }
}

/// A minimal graph document with one node.
pub fn graph_doc(graph_name: &str, nodes: Vec<NodeDocument>) -> GraphDocument {
    GraphDocument {
        graph_name: graph_name.to_string(),
        nodes,
        derivatives: None,
        metadata: None,
    }
}

/// Write a tiny executable shell script at `path`, creating parent directories.
pub fn touch_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create node dir");
    }
    std::fs::write(path, b"#!/bin/sh\nsleep 30\n").expect("write stub binary");
    let mut perms = std::fs::metadata(path).expect("stat stub binary").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).expect("chmod stub binary");
}

/// Write a `git_hash.o` sidecar next to `binary` containing `hash`.
pub fn write_sidecar(binary: &Path, hash: &str) {
    let dir = binary.parent().expect("binary has parent dir");
    std::fs::write(dir.join("git_hash.o"), format!("{hash}\n")).expect("write sidecar");
}

/// A [`VcsQuery`] that never finds a repository — every directory behaves as if
/// it's outside version control, so the sidecar hash is authoritative.
#[derive(Debug, Clone, Default)]
pub struct NoVcs;

impl VcsQuery for NoVcs {
    fn head_hash(&self, _dir: &Path) -> Option<String> {
        None
    }
}

/// A [`VcsQuery`] that always reports a fixed head hash for any directory.
#[derive(Debug, Clone)]
pub struct FixedVcs(pub String);

impl VcsQuery for FixedVcs {
    fn head_hash(&self, _dir: &Path) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Build a `{param: value}` map as `updateParameters` entries expect.
pub fn params(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
