// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;

use brand_core::BrandError;
use nix::sys::signal::Signal;
use tokio::process::Command;
use tracing::warn;

use crate::handle::NodeHandle;

const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(15);

/// Owns every node child process spawned by one Booter. Tracks handles by
/// nickname so a graph reload can tell which nodes are still this booter's
/// responsibility.
pub struct ProcessSupervisor {
    children: HashMap<String, NodeHandle>,
    stage_timeout: Duration,
}

/// Outcome of [`ProcessSupervisor::terminate_all`]. `stuck` entries need an
/// operator to intervene — the supervisor will not retry them itself.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StopReport {
    pub stuck: Vec<(String, i32)>,
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self { children: HashMap::new(), stage_timeout: DEFAULT_STAGE_TIMEOUT }
    }
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the per-stage timeout. Production code should leave this at
    /// the default; tests use a short timeout so staged termination doesn't
    /// take 30 real seconds.
    pub fn with_stage_timeout(stage_timeout: Duration) -> Self {
        Self { children: HashMap::new(), stage_timeout }
    }

    pub fn spawn(&mut self, nickname: &str, argv: &[String]) -> Result<(), BrandError> {
        let (program, args) = argv.split_first().ok_or_else(|| BrandError::node(
            format!("empty argv for node {nickname}"),
            "",
            nickname,
        ))?;
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|err| BrandError::node(format!("failed to spawn {nickname}: {err}"), "", nickname))?;
        self.children.insert(nickname.to_string(), NodeHandle::new(nickname, child));
        Ok(())
    }

    pub fn is_alive(&self, nickname: &str) -> bool {
        self.children.get(nickname).is_some_and(NodeHandle::is_alive)
    }

    pub fn nicknames(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Interrupt, then kill, every child still running; drain the handle map.
    /// A child already gone when this is called contributes nothing to
    /// `stuck`.
    pub async fn terminate_all(&mut self) -> StopReport {
        let mut report = StopReport::default();
        for (nickname, mut handle) in self.children.drain() {
            if !handle.is_alive() {
                continue;
            }

            if handle.send_signal(Signal::SIGINT).is_ok()
                && tokio::time::timeout(self.stage_timeout, handle.wait()).await.is_ok()
            {
                continue;
            }

            if handle.send_signal(Signal::SIGKILL).is_ok()
                && tokio::time::timeout(self.stage_timeout, handle.wait()).await.is_ok()
            {
                continue;
            }

            report.stuck.push((nickname, handle.pid));
        }

        if !report.stuck.is_empty() {
            let listing = report
                .stuck
                .iter()
                .map(|(nickname, pid)| format!("{nickname} ({pid})"))
                .collect::<Vec<_>>()
                .join(", ");
            warn!("could not kill: {listing}");
        }

        report
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
