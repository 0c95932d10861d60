// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Closed error taxonomy for the Booter/Supervisor pair.
//!
//! The reference implementation dispatches recovery behavior by comparing
//! exception identities (`exc is NodeError`), which never actually matches an
//! instance against its own class and silently falls through to the `else`
//! branch. Here disposition is an exhaustive match over a closed enum, so the
//! bug class doesn't exist.

use thiserror::Error;

/// The original exception class a `BooterError` wraps, carried on the wire so the
/// coordinator can distinguish a `CommandError` (non-fatal, keep running) from
/// everything else (fatal, stop the graph) without parsing message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooterSourceKind {
    Graph,
    Node,
    Command,
    Other,
}

crate::simple_display! {
    BooterSourceKind {
        Graph => "GraphError",
        Node => "NodeError",
        Command => "CommandError",
        Other => "Unhandled exception",
    }
}

#[derive(Debug, Error)]
pub enum BrandError {
    /// Graph validation or parameter-validation failure. Keeps or reverts to the
    /// previous lifecycle state; never kills running children.
    #[error("{message}")]
    Graph {
        message: String,
        graph: Option<String>,
    },

    /// Missing executable, duplicate nickname, or a fatal hash mismatch. Escalates
    /// to `stopGraph`.
    #[error("{message}")]
    Node {
        message: String,
        graph: Option<String>,
        node: String,
    },

    /// A fault reported by a remote Booter on `booter_status`.
    #[error("{message}")]
    Booter {
        message: String,
        machine: String,
        graph: Option<String>,
        booter_traceback: String,
        source_kind: BooterSourceKind,
    },

    /// The external derivative (export) subprocess exited non-zero.
    #[error("{message}")]
    Derivative {
        message: String,
        derivative: String,
        graph: Option<String>,
        stdout: String,
        stderr: String,
    },

    /// A local subprocess (e.g. `make`) exited non-zero, or a command was rejected
    /// (e.g. issued while a graph is running).
    #[error("{message}")]
    Command {
        message: String,
        process: String,
        command: String,
        details: String,
    },

    /// The store is unreachable. Fatal to the component.
    #[error("store error: {message}")]
    Store { message: String },

    /// Unexpected I/O failure (reading a graph file, a hash sidecar, etc).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Anything not classified above. Reported on the component's `_status` stream
    /// with a traceback; the component keeps listening.
    #[error("unhandled error: {message}")]
    Unhandled { message: String },
}

impl BrandError {
    pub fn graph(message: impl Into<String>, graph: impl Into<String>) -> Self {
        Self::Graph {
            message: message.into(),
            graph: Some(graph.into()),
        }
    }

    pub fn node(message: impl Into<String>, graph: impl Into<String>, node: impl Into<String>) -> Self {
        Self::Node {
            message: message.into(),
            graph: Some(graph.into()),
            node: node.into(),
        }
    }

    pub fn command(
        message: impl Into<String>,
        process: impl Into<String>,
        command: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::Command {
            message: message.into(),
            process: process.into(),
            command: command.into(),
            details: details.into(),
        }
    }

    /// The class name this error is reported under on a `_status` stream, matching
    /// the reference implementation's string vocabulary so existing dashboards and
    /// node-side tooling that matches on these strings keep working.
    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Graph { .. } => "GraphError",
            Self::Node { .. } => "NodeError",
            Self::Booter { .. } => "BooterError",
            Self::Derivative { .. } => "DerivativeError",
            Self::Command { .. } => "CommandError",
            Self::Store { .. } => "RedisError",
            Self::Io(_) => "Unhandled exception",
            Self::Unhandled { .. } => "Unhandled exception",
        }
    }

    /// Whether this error should cause the current process to exit rather than keep
    /// listening. Only store-connection loss is fatal at this layer — `Node`/`Graph`
    /// escalation to `stopGraph` is a graph-lifecycle concern, not a process exit.
    pub fn is_fatal_to_process(&self) -> bool {
        matches!(self, Self::Store { .. })
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
