// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git-hash reconciliation. Three possible sources for a node's hash — the
//! supergraph's recorded value, an on-disk `git_hash.o` sidecar, and a live VCS
//! query against the binary's directory — are compared pairwise; every mismatch
//! is a warning, never fatal (§9 of the design notes).

use std::path::Path;
use std::process::Command;

/// Queries a directory's current VCS head commit. Abstracted so tests don't need
/// a real git repository on disk.
pub trait VcsQuery: Send + Sync {
    /// Returns `None` when `dir` is not under version control (or the query
    /// otherwise fails) rather than erroring — per the spec, a non-VCS directory
    /// falls back to the sidecar hash as authoritative.
    fn head_hash(&self, dir: &Path) -> Option<String>;
}

/// Shells out to `git -C <dir> rev-parse HEAD`, matching the reference
/// implementation's use of the `git` binary for hash reconciliation.
#[derive(Debug, Clone, Default)]
pub struct GitVcsQuery;

impl VcsQuery for GitVcsQuery {
    fn head_hash(&self, dir: &Path) -> Option<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(dir)
            .arg("rev-parse")
            .arg("HEAD")
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        String::from_utf8(output.stdout)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Read the `git_hash.o` sidecar next to a binary, if present.
pub fn read_sidecar_hash(binary_dir: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(binary_dir.join("git_hash.o")).ok()?;
    contents.lines().next().map(|s| s.trim().to_string())
}

/// Outcome of reconciling the three hash sources for one node or derivative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashReconciliation {
    /// The hash recorded into the supergraph: the sidecar value, or empty when
    /// no sidecar was found.
    pub resolved: String,
    /// Non-fatal warnings to log (VCS-vs-sidecar mismatch, missing sidecar, or a
    /// recorded-vs-on-disk mismatch).
    pub warnings: Vec<String>,
}

/// Reconcile hash sources for a single binary/script directory.
///
/// `previously_recorded` is the hash already present in an existing supergraph
/// entry (e.g. when re-validating); pass `None` on first load.
pub fn reconcile_hash(
    vcs: &dyn VcsQuery,
    binary_dir: &Path,
    label: &str,
    previously_recorded: Option<&str>,
) -> HashReconciliation {
    let mut warnings = Vec::new();
    let sidecar = read_sidecar_hash(binary_dir);

    let resolved = match &sidecar {
        Some(hash) => hash.clone(),
        None => {
            warnings.push(format!(
                "Could not log Git hash for {label}, could not find compiled git_hash.o file"
            ));
            String::new()
        }
    };

    if let Some(sidecar_hash) = &sidecar {
        if let Some(repo_hash) = vcs.head_hash(binary_dir) {
            if &repo_hash != sidecar_hash {
                warnings.push(format!(
                    "Git hash for {label} does not match the repository's Git hash, remake"
                ));
            }
        }
    }

    if let Some(prev) = previously_recorded {
        if !prev.is_empty() && prev != resolved {
            warnings.push(format!(
                "Git hash for {label} does not match supergraph"
            ));
        }
    }

    HashReconciliation { resolved, warnings }
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
