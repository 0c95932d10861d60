// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::Parser;

/// Supervisor Coordinator: owns the store process, the published supergraph,
/// and the graph lifecycle.
#[derive(Debug, Parser)]
#[command(name = "supervisor", version)]
pub struct Cli {
    /// Path to a graph file to load at startup.
    #[arg(short = 'g', long)]
    pub graph: Option<PathBuf>,

    /// IP address to bind the store to.
    #[arg(short = 'i', long = "host", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the store to.
    #[arg(short = 'p', long, default_value_t = 6379)]
    pub port: u16,

    /// Unix socket to bind the store to.
    #[arg(short = 's', long)]
    pub socket: Option<String>,

    /// Config file for the store server process.
    #[arg(short = 'c', long = "cfg")]
    pub cfg: Option<PathBuf>,

    /// This machine's name, published into the supergraph.
    #[arg(short = 'm', long)]
    pub machine: Option<String>,

    /// Real-time priority for the store process.
    #[arg(short = 'r', long = "redis-priority")]
    pub store_priority: Option<i32>,

    /// CPU affinity for the store process.
    #[arg(short = 'a', long = "redis-affinity")]
    pub store_affinity: Option<String>,

    /// Base directory under which node binaries live.
    #[arg(short = 'b', long)]
    pub binary_dir: PathBuf,

    /// Working directory for `make` and the NWB export derivative.
    #[arg(long)]
    pub project_dir: Option<PathBuf>,

    /// Path to the store server binary.
    #[arg(long, default_value = "redis-server")]
    pub store_binary: String,

    /// Root data directory for save paths.
    #[arg(short = 'd', long = "data-dir", default_value = "/tmp/brand")]
    pub data_dir: PathBuf,

    /// Directory for rotating log files; stderr-only when absent.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}
