// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::os::unix::process::ExitStatusExt;
use std::path::Path;

use brand_core::{hash::reconcile_hash, resolve_binary_path, BrandError, VcsQuery};
use brand_process::{build_argv, LaunchSpec, ProcessSupervisor};
use brand_store::StoreClient;
use brand_wire::{BooterCommand, BooterStatusEvent, Stream};
use tracing::{info, warn};

/// Fixed inputs for one Booter process lifetime.
pub struct BooterContext<'a> {
    pub machine: &'a str,
    pub binary_dir: &'a Path,
    pub project_dir: &'a Path,
    pub vcs: &'a dyn VcsQuery,
}

/// Runs the Booter command loop until a shutdown signal or a fatal store
/// error. Returns `Ok(())` on clean shutdown.
pub async fn run<S: StoreClient>(store: &S, ctx: &BooterContext<'_>) -> Result<(), BrandError> {
    let mut supervisor = ProcessSupervisor::new();
    let mut last_id = "$".to_string();
    let mut current_graph_name = String::new();

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                emit_status(store, ctx.machine, "stopped/not initialized", None, None).await;
                return Ok(());
            }
            batches = store.read_tail(&[(Stream::Booter.as_str(), &last_id)], None, 5_000) => {
                for (_, entries) in batches? {
                    for entry in entries {
                        last_id = entry.id.clone();
                        match BooterCommand::parse(&entry.fields) {
                            Ok(Some(command)) => {
                                if let Err(err) =
                                    handle_command(store, ctx, &mut supervisor, &mut current_graph_name, command).await
                                {
                                    if err.is_fatal_to_process() {
                                        return Err(err);
                                    }
                                    emit_status(store, ctx.machine, err.status_label(), Some(err.to_string()), Some(String::new())).await;
                                }
                            }
                            Ok(None) => warn!("unrecognized booter command, ignoring"),
                            Err(err) => {
                                emit_status(store, ctx.machine, err.status_label(), Some(err.to_string()), Some(String::new())).await;
                            }
                        }
                    }
                }
            }
        }
    }
}

async fn handle_command<S: StoreClient>(
    store: &S,
    ctx: &BooterContext<'_>,
    supervisor: &mut ProcessSupervisor,
    current_graph_name: &mut String,
    command: BooterCommand,
) -> Result<(), BrandError> {
    match command {
        BooterCommand::StartGraph { supergraph } => {
            let brand_reconciliation =
                reconcile_hash(ctx.vcs, ctx.binary_dir, "BRAND", Some(&supergraph.brand_hash));
            for warning in &brand_reconciliation.warnings {
                warn!("{warning}");
            }

            // Unlike the coordinator's own `Supergraph::local_nodes`, a Booter must
            // never pick up a machine-less node — those belong to the coordinator
            // alone (`booter.py:168,182` only starts a node when `cfg['machine']`
            // is present and equals this machine).
            let booter_nodes = supergraph.nodes.values().filter(|n| n.machine.as_deref() == Some(ctx.machine));
            for node in booter_nodes {
                let binary = resolve_binary_path(ctx.binary_dir, &node.module, &node.name);
                if !binary.exists() {
                    return Err(BrandError::node(
                        format!("{} executable was not found at {}", node.name, binary.display()),
                        supergraph.graph_name.clone(),
                        node.nickname.clone(),
                    ));
                }

                let reconciliation = reconcile_hash(
                    ctx.vcs,
                    binary.parent().unwrap_or(ctx.binary_dir),
                    &format!("{} node nickname", node.nickname),
                    Some(&node.git_hash),
                );
                for warning in &reconciliation.warnings {
                    warn!("{warning}");
                }

                let argv = build_argv(&LaunchSpec {
                    binary: &binary.to_string_lossy(),
                    nickname: &node.nickname,
                    host: &supergraph.redis_host,
                    port: supergraph.redis_port,
                    socket: None,
                    run_priority: node.run_priority,
                    cpu_affinity: node.cpu_affinity.as_deref(),
                });
                supervisor.spawn(&node.nickname, &argv)?;
            }

            *current_graph_name = supergraph.graph_name.clone();
            emit_status(
                store,
                ctx.machine,
                &format!("{} graph started successfully", supergraph.graph_name),
                None,
                None,
            )
            .await;
            Ok(())
        }
        BooterCommand::StopGraph => {
            supervisor.terminate_all().await;
            emit_status(
                store,
                ctx.machine,
                &format!("{current_graph_name} graph stopped successfully"),
                None,
                None,
            )
            .await;
            Ok(())
        }
        BooterCommand::Make => run_make(store, ctx).await,
    }
}

async fn run_make<S: StoreClient>(store: &S, ctx: &BooterContext<'_>) -> Result<(), BrandError> {
    let output = tokio::process::Command::new("make")
        .current_dir(ctx.project_dir)
        .output()
        .await?;

    match output.status.code() {
        Some(0) => {
            emit_status(store, ctx.machine, "make succeeded", None, None).await;
            Ok(())
        }
        Some(code) => Err(BrandError::command(
            "make failed",
            "make",
            "make",
            format!(
                "exit code {code}\nstdout:\n{}\nstderr:\n{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            ),
        )),
        None => {
            let signal = output.status.signal().map(|s| s.to_string()).unwrap_or_else(|| "unknown".to_string());
            warn!("make was terminated by signal {signal}");
            Ok(())
        }
    }
}

async fn emit_status<S: StoreClient>(
    store: &S,
    machine: &str,
    status: &str,
    message: Option<String>,
    traceback: Option<String>,
) {
    let event = match (message, traceback) {
        (Some(message), Some(traceback)) => BooterStatusEvent::failed(machine, status, message, traceback),
        _ => BooterStatusEvent::new(machine, status),
    };
    if let Err(err) = store.append(Stream::BooterStatus.as_str(), event.to_fields()).await {
        warn!("failed to append booter_status: {err}");
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
