// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::Parser;

/// Per-machine Booter daemon: spawns and tears down this machine's node
/// processes on behalf of the Supervisor Coordinator.
#[derive(Debug, Parser)]
#[command(name = "booter", version)]
pub struct Cli {
    /// This machine's name, matched against a node's `machine` field.
    #[arg(short = 'm', long)]
    pub machine: String,

    /// Store host.
    #[arg(short = 'i', long = "host", default_value = "127.0.0.1")]
    pub store_host: String,

    /// Store port.
    #[arg(short = 'p', long = "port", default_value_t = 6379)]
    pub store_port: u16,

    /// Base directory under which node binaries live, as
    /// `<binary_dir>/<module>/nodes/<name>/<name>.bin`.
    #[arg(short = 'b', long)]
    pub binary_dir: PathBuf,

    /// Working directory for the `make` command verb.
    #[arg(long)]
    pub project_dir: Option<PathBuf>,

    /// Directory for rotating log files; stderr-only when absent.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}
