// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Arguments needed to launch one node, independent of how it gets wrapped.
pub struct LaunchSpec<'a> {
    pub binary: &'a str,
    pub nickname: &'a str,
    pub host: &'a str,
    pub port: u16,
    pub socket: Option<&'a str>,
    pub run_priority: Option<i32>,
    pub cpu_affinity: Option<&'a str>,
}

/// Builds `[binary, -n, nickname, -i, host, -p, port, (-s, socket)]`, prefixed
/// with `chrt -f <priority>` and/or `taskset -c <mask>` wrappers when
/// requested. The first element is always the program to exec.
pub fn build_argv(spec: &LaunchSpec<'_>) -> Vec<String> {
    let mut argv = vec![
        spec.binary.to_string(),
        "-n".to_string(),
        spec.nickname.to_string(),
        "-i".to_string(),
        spec.host.to_string(),
        "-p".to_string(),
        spec.port.to_string(),
    ];
    if let Some(socket) = spec.socket {
        argv.push("-s".to_string());
        argv.push(socket.to_string());
    }
    if let Some(affinity) = spec.cpu_affinity {
        argv.splice(0..0, ["taskset".to_string(), "-c".to_string(), affinity.to_string()]);
    }
    if let Some(priority) = spec.run_priority {
        argv.splice(0..0, ["chrt".to_string(), "-f".to_string(), priority.to_string()]);
    }
    argv
}

#[cfg(test)]
#[path = "argv_tests.rs"]
mod tests;
