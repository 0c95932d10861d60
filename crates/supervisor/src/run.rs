// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `supervisor_ipstream` command loop: one 5-second blocking read per
//! iteration, preceded by a one-shot `booter_status` poll, matching
//! `Supervisor.main`/`Supervisor.checkBooter` in the reference implementation.

use brand_core::{BooterSourceKind, BrandError, GraphStatus};
use brand_store::StoreClient;
use brand_wire::{GraphStatusEvent, Stream, SupervisorCommand, SupervisorStatusEvent};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::lifecycle::Lifecycle;

/// Runs the command loop until a shutdown signal or a fatal store error.
pub async fn run<S: StoreClient>(store: &S, lc: &mut Lifecycle<'_>) -> Result<(), BrandError> {
    let mut last_id = "$".to_string();
    info!("listening for commands");
    emit_supervisor_status(store, "Listening for commands", None, None).await;

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                info!("SIGINT received, exiting");
                emit_supervisor_status(store, "SIGINT received, Exiting", None, None).await;
                return Ok(());
            }
            result = tick(store, lc, &mut last_id) => {
                if let Err(err) = result {
                    if err.is_fatal_to_process() {
                        error!("supervisor exiting on fatal store error: {err}");
                        return Err(err);
                    }
                }
            }
        }
    }
}

async fn tick<S: StoreClient>(store: &S, lc: &mut Lifecycle<'_>, last_id: &mut String) -> Result<(), BrandError> {
    if let Err(err) = lc.poll_booter_status(store).await {
        handle_booter_error(store, lc, err).await;
    }

    let batches = store.read_tail(&[(Stream::SupervisorIpstream.as_str(), last_id.as_str())], Some(1), 5_000).await?;
    for (_, entries) in batches {
        for entry in entries {
            *last_id = entry.id.clone();
            if !entry.fields.contains_key("commands") {
                emit_supervisor_status(
                    store,
                    "Invalid supervisor_ipstream entry",
                    Some("No 'commands' key found in the supervisor_ipstream entry".to_string()),
                    None,
                )
                .await;
                error!("'commands' key not in supervisor_ipstream entry");
                emit_supervisor_status(store, "Listening for commands", None, None).await;
                continue;
            }

            match SupervisorCommand::parse(&entry.fields) {
                Ok(Some(command)) => {
                    if let Err(err) = dispatch(store, lc, command).await {
                        handle_command_error(store, lc, err).await;
                    }
                }
                Ok(None) => warn!("invalid command, ignoring"),
                Err(err) => handle_command_error(store, lc, err).await,
            }
        }
    }
    Ok(())
}

async fn dispatch<S: StoreClient>(store: &S, lc: &mut Lifecycle<'_>, command: SupervisorCommand) -> Result<(), BrandError> {
    let now = Utc::now();
    match command {
        SupervisorCommand::LoadGraph { source, rdb_filename } => {
            reject_if_running(lc)?;
            lc.load_graph(store, source, rdb_filename, now).await
        }
        SupervisorCommand::StartGraph { source, rdb_filename } => {
            if source.is_some() {
                reject_if_running(lc)?;
            }
            lc.start_graph(store, source, rdb_filename, now).await
        }
        SupervisorCommand::StopGraph => lc.stop_graph(store).await,
        SupervisorCommand::UpdateParameters { updates } => lc.update_parameters(store, updates).await,
        SupervisorCommand::SaveRdb => lc.save_rdb(store).await,
        SupervisorCommand::SaveNwb => lc.save_nwb(store).await,
        SupervisorCommand::StopGraphAndSaveNwb => lc.stop_graph_and_save_nwb(store, now).await,
        SupervisorCommand::FlushDb => lc.flush_db(store, now).await,
        SupervisorCommand::SetDataDir { path } => {
            lc.set_data_dir(path);
            Ok(())
        }
        SupervisorCommand::Make => lc.make(store).await,
    }
}

fn reject_if_running(lc: &Lifecycle<'_>) -> Result<(), BrandError> {
    if lc.has_local_children() {
        return Err(BrandError::graph(
            "Graph already running, run stopGraph before initiating another graph",
            lc.graph_name().unwrap_or_default(),
        ));
    }
    Ok(())
}

/// A fault reported by a remote Booter, found by the once-per-tick
/// `booter_status` poll. A `CommandError` source is reported but does not
/// stop the graph; anything else does.
async fn handle_booter_error<S: StoreClient>(store: &S, lc: &mut Lifecycle<'_>, err: BrandError) {
    let BrandError::Booter { message, machine, booter_traceback, source_kind, .. } = &err else {
        return handle_command_error(store, lc, err).await;
    };
    error!("error with the {machine} machine: {message}");

    if *source_kind == BooterSourceKind::Command {
        emit_supervisor_status(store, source_kind.to_string(), Some(message.clone()), Some(booter_traceback.clone())).await;
        return;
    }

    append_graph_failed(store, message.clone(), booter_traceback.clone()).await;
    if let Err(stop_err) = lc.stop_graph(store).await {
        warn!("failed to stop graph after booter error: {stop_err}");
    }
}

/// Dispatch table for errors raised while handling one `supervisor_ipstream`
/// command, matching `Supervisor.main`'s per-exception-type handling.
async fn handle_command_error<S: StoreClient>(store: &S, lc: &mut Lifecycle<'_>, err: BrandError) {
    error!("{err}");
    match &err {
        BrandError::Graph { message, .. } => {
            append_graph_failed(store, message.clone(), String::new()).await;
            revert_or_stop(store, lc).await;
        }
        BrandError::Node { message, node, .. } => {
            error!("error with the {node} node");
            append_graph_failed(store, message.clone(), String::new()).await;
            if let Err(stop_err) = lc.stop_graph(store).await {
                warn!("failed to stop graph after node error: {stop_err}");
            }
        }
        BrandError::Derivative { message, stdout, stderr, .. } => {
            let traceback = format!("STDOUT: {stdout}\nSTDERR: {stderr}");
            append_graph_failed(store, message.clone(), traceback).await;
            revert_or_stop(store, lc).await;
        }
        BrandError::Command { message, command, details, .. } => {
            error!("could not execute {command} command");
            emit_supervisor_status(store, "Command error", Some(message.clone()), Some(details.clone())).await;
            emit_supervisor_status(store, "Listening for commands", None, None).await;
        }
        BrandError::Booter { .. } => {
            handle_booter_error(store, lc, err).await;
        }
        BrandError::Store { .. } => {
            // Fatal to the process; propagated by the caller, nothing to log here.
        }
        BrandError::Io(_) | BrandError::Unhandled { .. } => {
            emit_supervisor_status(store, "Unhandled exception", Some(err.to_string()), None).await;
            emit_supervisor_status(store, "Listening for commands", None, None).await;
        }
    }
}

/// Restore the previous `graph_status` if local nodes are still tracked
/// (the graph failed to *update* but is still running), otherwise mark the
/// graph stopped — matching the reference implementation's `self.children`
/// check after a `GraphError`/`DerivativeError`.
async fn revert_or_stop<S: StoreClient>(store: &S, lc: &Lifecycle<'_>) {
    if lc.has_local_children() {
        if let Ok(previous) = store.read_reverse(Stream::GraphStatus.as_str(), 2).await {
            if let Some(entry) = previous.get(1) {
                if let Some(status) = entry.fields.get("status").cloned() {
                    let _ = store
                        .append(Stream::GraphStatus.as_str(), GraphStatusEvent::ok(status.parse().unwrap_or(GraphStatus::Running)).to_fields())
                        .await;
                }
            }
        }
    } else if let Err(err) = store.append(Stream::GraphStatus.as_str(), GraphStatusEvent::ok(GraphStatus::Stopped).to_fields()).await {
        warn!("failed to append graph_status: {err}");
    }
}

async fn append_graph_failed<S: StoreClient>(store: &S, message: String, traceback: String) {
    if let Err(err) = store
        .append(Stream::GraphStatus.as_str(), GraphStatusEvent::failed(GraphStatus::GraphFailed, message, traceback).to_fields())
        .await
    {
        warn!("failed to append graph_status: {err}");
    }
}

async fn emit_supervisor_status<S: StoreClient>(
    store: &S,
    status: impl Into<String>,
    message: Option<String>,
    traceback: Option<String>,
) {
    let event = match (message, traceback) {
        (Some(message), Some(traceback)) => SupervisorStatusEvent::failed(status, message, traceback),
        _ => SupervisorStatusEvent::new(status),
    };
    if let Err(err) = store.append(Stream::SupervisorStatus.as_str(), event.to_fields()).await {
        warn!("failed to append supervisor_status: {err}");
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
