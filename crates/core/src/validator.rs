// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns a [`GraphDocument`] into a [`Supergraph`], or fails with a precise
//! [`BrandError`]. Pure: no disk writes, no store round-trips. Hash-mismatch
//! warnings are returned to the caller to log rather than logged here, keeping
//! this module a pure function of its inputs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::BrandError;
use crate::graph::GraphDocument;
use crate::hash::{reconcile_hash, VcsQuery};
use crate::node::{DerivativeSpec, ResolvedNode};
use crate::supergraph::Supergraph;

/// Result of a successful validation: the published supergraph plus any
/// non-fatal hash-mismatch warnings to log.
pub struct Validated {
    pub supergraph: Supergraph,
    pub warnings: Vec<String>,
}

/// Resolve `<base>/<module>/nodes/<name>/<name>.bin`, matching
/// `search_node_bin_file` in the reference implementation.
pub fn resolve_binary_path(base_dir: &Path, module: &str, name: &str) -> PathBuf {
    base_dir
        .join(module)
        .join("nodes")
        .join(name)
        .join(format!("{name}.bin"))
}

#[allow(clippy::too_many_arguments)]
pub fn validate_graph(
    doc: &GraphDocument,
    base_dir: &Path,
    self_machine: Option<&str>,
    redis_host: &str,
    redis_port: u16,
    brand_hash: &str,
    graph_loaded_ts: u64,
    vcs: &dyn VcsQuery,
) -> Result<Validated, BrandError> {
    let mut warnings = Vec::new();
    let mut nodes = BTreeMap::new();

    for node in &doc.nodes {
        if nodes.contains_key(&node.nickname) {
            return Err(BrandError::node(
                format!("Duplicate node nicknames found: {}", node.nickname),
                doc.graph_name.clone(),
                node.nickname.clone(),
            ));
        }

        let binary = resolve_binary_path(base_dir, &node.module, &node.name);
        let targets_self = node.machine.as_deref().map_or(true, |m| {
            self_machine.map(|me| m == me).unwrap_or(false)
        });

        if targets_self && !binary.exists() {
            return Err(BrandError::node(
                format!("{} executable was not found at {}", node.name, binary.display()),
                doc.graph_name.clone(),
                node.name.clone(),
            ));
        }

        let reconciliation = reconcile_hash(
            vcs,
            binary.parent().unwrap_or(base_dir),
            &format!("{} node nickname", node.nickname),
            None,
        );
        warnings.extend(reconciliation.warnings);

        nodes.insert(
            node.nickname.clone(),
            ResolvedNode {
                nickname: node.nickname.clone(),
                name: node.name.clone(),
                module: node.module.clone(),
                machine: node.machine.clone(),
                run_priority: node.run_priority,
                cpu_affinity: node.cpu_affinity.clone(),
                parameters: node.parameters.clone(),
                binary: binary.display().to_string(),
                git_hash: reconciliation.resolved,
                extra: node.extra.clone(),
            },
        );
    }

    let derivatives = match &doc.derivatives {
        None => None,
        Some(docs) => {
            let mut resolved = BTreeMap::new();
            for derivative in docs {
                let mut extra = derivative.spec.clone();
                if let Some(script_path) = derivative.script_path() {
                    let script_path = base_dir.join(script_path);
                    if !script_path.exists() {
                        return Err(BrandError::graph(
                            format!("Could not find derivative at {}", script_path.display()),
                            doc.graph_name.clone(),
                        ));
                    }
                    let reconciliation = reconcile_hash(
                        vcs,
                        script_path.parent().unwrap_or(base_dir),
                        &format!("{} derivative", derivative.name),
                        None,
                    );
                    warnings.extend(reconciliation.warnings);
                    extra.insert(
                        "git_hash".to_string(),
                        serde_json::Value::String(reconciliation.resolved.clone()),
                    );
                    resolved.insert(
                        derivative.name.clone(),
                        DerivativeSpec {
                            git_hash: reconciliation.resolved,
                            extra,
                        },
                    );
                } else {
                    resolved.insert(
                        derivative.name.clone(),
                        DerivativeSpec {
                            git_hash: String::new(),
                            extra,
                        },
                    );
                }
            }
            Some(resolved)
        }
    };

    Ok(Validated {
        supergraph: Supergraph {
            redis_host: redis_host.to_string(),
            redis_port,
            brand_hash: brand_hash.to_string(),
            graph_name: doc.graph_name.clone(),
            graph_loaded_ts,
            nodes,
            derivatives,
        },
        warnings,
    })
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
