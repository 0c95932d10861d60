// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawns the store server process and connects a [`StoreClient`] to it,
//! matching `Supervisor.start_redis_server` in the reference implementation.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use brand_core::BrandError;
use brand_store::{RedisStoreClient, StoreClient};
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::config::Cli;

/// A spawned, still-running store process. Dropping this does not kill the
/// process — the store outlives the coordinator's own supervision of node
/// children, and is torn down by the operator or the init system.
pub struct StoreProcess {
    pub child: tokio::process::Child,
}

fn build_store_argv(cli: &Cli) -> Vec<String> {
    let mut argv = vec![cli.store_binary.clone()];
    if let Some(cfg) = &cli.cfg {
        argv.push(cfg.to_string_lossy().into_owned());
    }
    argv.push("--bind".to_string());
    argv.push(cli.host.clone());
    argv.push("--port".to_string());
    argv.push(cli.port.to_string());
    if let Some(socket) = &cli.socket {
        argv.push("--unixsocket".to_string());
        argv.push(socket.clone());
    }
    if let Some(affinity) = &cli.store_affinity {
        argv.splice(0..0, ["taskset".to_string(), "-c".to_string(), affinity.clone()]);
    }
    if let Some(priority) = cli.store_priority {
        argv.splice(0..0, ["chrt".to_string(), "-f".to_string(), priority.to_string()]);
    }
    argv
}

/// Spawns the store process and gives it one second to either fail visibly
/// (e.g. "Address already in use") or settle into the background, matching
/// the reference implementation's `communicate(timeout=1)` probe: a process
/// that exits within the window is a startup failure, one that is still
/// running after the window is the success case.
pub async fn spawn_store(cli: &Cli) -> Result<StoreProcess, BrandError> {
    let argv = build_store_argv(cli);
    let Some((program, args)) = argv.split_first() else {
        return Err(BrandError::Store { message: "empty store command line".to_string() });
    };
    info!("starting store: {}", argv.join(" "));

    let mut child = tokio::process::Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|err| BrandError::Store { message: format!("failed to spawn {program}: {err}") })?;

    let mut stdout = child.stdout.take();
    let probe = tokio::time::timeout(Duration::from_secs(1), async {
        let mut buf = Vec::new();
        if let Some(stdout) = stdout.as_mut() {
            let _ = stdout.read_to_end(&mut buf).await;
        }
        let status = child.wait().await;
        (status, buf)
    })
    .await;

    match probe {
        Ok((Ok(_status), output)) => {
            let output = String::from_utf8_lossy(&output);
            tracing::debug!("{output}");
            Err(BrandError::Store {
                message: if output.contains("Address already in use") {
                    "could not run store server (address already in use); is the supervisor already running?".to_string()
                } else {
                    "launching store server failed for an unknown reason, check supervisor logs".to_string()
                },
            })
        }
        Ok((Err(err), _)) => Err(BrandError::Store { message: format!("store process wait failed: {err}") }),
        Err(_) => {
            info!("store server is running");
            Ok(StoreProcess { child })
        }
    }
}

/// Connects a [`RedisStoreClient`] to the just-spawned store and points its
/// initial save directory at `data_dir` directly (not yet the per-graph save
/// path, which is only known once a graph is loaded).
pub async fn connect(cli: &Cli) -> Result<RedisStoreClient, BrandError> {
    let addr = format!("redis://{}:{}/", cli.host, cli.port);
    let store = RedisStoreClient::connect(&addr, Duration::from_secs(1)).await?;

    let data_dir: &Path = &cli.data_dir;
    std::fs::create_dir_all(data_dir)?;
    store.set_config("dir", &data_dir.to_string_lossy()).await?;
    store.set_config("dbfilename", &initial_rdb_filename()).await?;
    Ok(store)
}

fn initial_rdb_filename() -> String {
    crate::paths::idle_filename(chrono::Utc::now())
}
