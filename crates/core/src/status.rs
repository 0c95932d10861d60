// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `graph_status` lifecycle, appended by the coordinator throughout a run.

use std::str::FromStr;

/// One entry in the `graph_status` stream.
///
/// Wire values match the reference implementation's literal strings exactly —
/// nodes and external observers tail this stream and match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphStatus {
    Initialized,
    Parsing,
    GraphFailed,
    Running,
    Published,
    Stopped,
}

crate::simple_display! {
    GraphStatus {
        Initialized => "initialized",
        Parsing => "parsing",
        GraphFailed => "graph failed",
        Running => "running",
        Published => "published",
        Stopped => "stopped/not initialized",
    }
}

impl FromStr for GraphStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "initialized" => Self::Initialized,
            "parsing" => Self::Parsing,
            "graph failed" => Self::GraphFailed,
            "running" => Self::Running,
            "published" => Self::Published,
            "stopped/not initialized" => Self::Stopped,
            other => return Err(format!("unrecognized graph_status value: {other}")),
        })
    }
}

impl GraphStatus {
    /// Whether this status terminates the current run (no further transitions expected
    /// without a fresh `loadGraph`/`startGraph`).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::GraphFailed)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
