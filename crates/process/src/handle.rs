// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::process::Child;

/// A single spawned node, tracked by nickname for diagnostics.
pub struct NodeHandle {
    pub nickname: String,
    pub pid: i32,
    child: Child,
}

impl NodeHandle {
    pub fn new(nickname: impl Into<String>, child: Child) -> Self {
        let pid = child.id().unwrap_or(0) as i32;
        Self { nickname: nickname.into(), pid, child }
    }

    /// A zero signal delivers no signal but still reports `ESRCH` if the pid
    /// is gone — the standard liveness probe.
    pub fn is_alive(&self) -> bool {
        signal::kill(Pid::from_raw(self.pid), None).is_ok()
    }

    pub fn send_signal(&self, signal: Signal) -> std::io::Result<()> {
        signal::kill(Pid::from_raw(self.pid), signal)
            .map_err(|errno| std::io::Error::from_raw_os_error(errno as i32))
    }

    pub async fn wait(&mut self) -> std::io::Result<std::process::ExitStatus> {
        self.child.wait().await
    }

    pub fn try_wait(&mut self) -> std::io::Result<Option<std::process::ExitStatus>> {
        self.child.try_wait()
    }
}
