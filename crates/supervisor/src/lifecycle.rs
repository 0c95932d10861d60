// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graph lifecycle state machine: the coordinator side of `loadGraph`,
//! `startGraph`, `stopGraph`, `updateParameters`, and the RDB/NWB snapshot
//! commands. One [`Lifecycle`] is owned by the supervisor's command loop for
//! the whole process lifetime.

use std::collections::BTreeMap;
use std::path::PathBuf;

use brand_core::{
    validate_graph, BooterSourceKind, BrandError, GraphDocument, GraphStatus, Supergraph, VcsQuery,
};
use brand_process::{build_argv, LaunchSpec, ProcessSupervisor};
use brand_store::StoreClient;
use brand_wire::{BooterCommand, GraphSource, Stream, StreamFields};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use crate::paths;

/// Fixed inputs for one coordinator process lifetime.
pub struct LifecycleConfig {
    pub binary_dir: PathBuf,
    pub data_dir: PathBuf,
    pub project_dir: PathBuf,
    pub redis_host: String,
    pub redis_port: u16,
    pub machine: Option<String>,
    pub brand_hash: String,
}

/// Owns the current graph, the local node supervisor, and the booter-status
/// read cursor. Not `Clone`: there is exactly one of these per process.
pub struct Lifecycle<'a> {
    pub config: LifecycleConfig,
    pub vcs: &'a dyn VcsQuery,
    pub process: ProcessSupervisor,
    current: Option<Supergraph>,
    current_doc: Option<GraphDocument>,
    save_path: Option<PathBuf>,
    rdb_filename: Option<String>,
    booter_status_id: String,
}

impl<'a> Lifecycle<'a> {
    pub fn new(config: LifecycleConfig, vcs: &'a dyn VcsQuery) -> Self {
        Self {
            config,
            vcs,
            process: ProcessSupervisor::new(),
            current: None,
            current_doc: None,
            save_path: None,
            rdb_filename: None,
            booter_status_id: "0-0".to_string(),
        }
    }

    pub fn graph_name(&self) -> Option<&str> {
        self.current.as_ref().map(|g| g.graph_name.as_str())
    }

    /// Whether this coordinator has any local node children tracked, running
    /// or not — mirrors the reference implementation's `self.children` truthy
    /// check used to reject `loadGraph`/`startGraph` while a graph is active.
    pub fn has_local_children(&self) -> bool {
        self.process.nicknames().next().is_some()
    }

    /// Parse, validate, and publish a graph, per SPEC_FULL.md §4.5 steps 1-4.
    /// Does not launch any nodes — see [`Self::start_graph`].
    pub async fn load_graph<S: StoreClient>(
        &mut self,
        store: &S,
        source: GraphSource,
        rdb_filename: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), BrandError> {
        self.append_graph_status(store, GraphStatus::Initialized, None, None).await;
        self.append_graph_status(store, GraphStatus::Parsing, None, None).await;

        let doc = match source {
            GraphSource::File(path) => GraphDocument::from_yaml_file(std::path::Path::new(&path)),
            GraphSource::Inline(value) => GraphDocument::from_json_value(value, "inline graph"),
        };
        let doc = match doc {
            Ok(doc) => doc,
            Err(err) => {
                self.append_graph_status(store, GraphStatus::GraphFailed, Some(err.to_string()), Some(String::new()))
                    .await;
                return Err(err);
            }
        };

        let save_path = paths::save_path(&self.config.data_dir, doc.metadata.as_ref(), now);
        let rdb_dir = paths::rdb_dir(&save_path);
        if let Err(err) = std::fs::create_dir_all(&rdb_dir) {
            let err = BrandError::from(err);
            self.append_graph_status(store, GraphStatus::GraphFailed, Some(err.to_string()), Some(String::new()))
                .await;
            return Err(err);
        }

        let filename = rdb_filename
            .clone()
            .unwrap_or_else(|| paths::snapshot_filename(&save_path, &doc.graph_name, now));
        store.set_config("dir", &rdb_dir.to_string_lossy()).await?;
        store.set_config("dbfilename", &filename).await?;

        let validated = validate_graph(
            &doc,
            &self.config.binary_dir,
            self.config.machine.as_deref(),
            &self.config.redis_host,
            self.config.redis_port,
            &self.config.brand_hash,
            now.timestamp().max(0) as u64,
            self.vcs,
        );
        let validated = match validated {
            Ok(validated) => validated,
            Err(err) => {
                self.append_graph_status(store, GraphStatus::GraphFailed, Some(err.to_string()), Some(String::new()))
                    .await;
                return Err(err);
            }
        };
        for warning in &validated.warnings {
            warn!("{warning}");
        }

        self.publish(store, &validated.supergraph).await?;
        self.append_graph_status(store, GraphStatus::Published, None, None).await;

        self.current = Some(validated.supergraph);
        self.current_doc = Some(doc);
        self.save_path = Some(save_path);
        self.rdb_filename = Some(filename);
        Ok(())
    }

    /// Launch the graph: load it first if `source` is given, otherwise reuse
    /// whatever is already loaded. SPEC_FULL.md §4.5 steps 5-8.
    pub async fn start_graph<S: StoreClient>(
        &mut self,
        store: &S,
        source: Option<GraphSource>,
        rdb_filename: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), BrandError> {
        if let Some(source) = source {
            self.load_graph(store, source, rdb_filename, now).await?;
        }
        let supergraph = self
            .current
            .clone()
            .ok_or_else(|| BrandError::graph("Could not start graph, no graph has been loaded yet", ""))?;

        store
            .append(Stream::Booter.as_str(), BooterCommand::StartGraph { supergraph: supergraph.clone() }.to_fields())
            .await?;

        for node in supergraph.local_nodes(self.config.machine.as_deref()) {
            if node.binary.is_empty() || !std::path::Path::new(&node.binary).exists() {
                return Err(BrandError::node(
                    format!("{} executable was not found at {}", node.name, node.binary),
                    supergraph.graph_name.clone(),
                    node.nickname.clone(),
                ));
            }
            let argv = build_argv(&LaunchSpec {
                binary: &node.binary,
                nickname: &node.nickname,
                host: &supergraph.redis_host,
                port: supergraph.redis_port,
                socket: None,
                run_priority: node.run_priority,
                cpu_affinity: node.cpu_affinity.as_deref(),
            });
            self.process.spawn(&node.nickname, &argv)?;
        }

        self.poll_booter_status(store).await?;
        self.append_graph_status(store, GraphStatus::Running, None, None).await;
        Ok(())
    }

    /// Broadcast `stopGraph`, mark the graph stopped, then kill local nodes —
    /// matching the reference implementation's exact ordering.
    pub async fn stop_graph<S: StoreClient>(&mut self, store: &S) -> Result<(), BrandError> {
        store.append(Stream::Booter.as_str(), BooterCommand::StopGraph.to_fields()).await?;
        self.append_graph_status(store, GraphStatus::Stopped, None, None).await;
        self.process.terminate_all().await;
        Ok(())
    }

    /// Validate every update against the loaded graph before applying any of
    /// them, then republish. Rejects the whole batch on the first bad entry.
    pub async fn update_parameters<S: StoreClient>(
        &mut self,
        store: &S,
        updates: BTreeMap<String, String>,
    ) -> Result<(), BrandError> {
        let supergraph = self
            .current
            .clone()
            .ok_or_else(|| BrandError::graph("Could not update graph parameters since no graph has been loaded yet", ""))?;

        let mut parsed: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
        for (nickname, payload) in &updates {
            if !supergraph.nodes.contains_key(nickname) {
                return Err(BrandError::graph(
                    format!("There is no {nickname} nickname in the supergraph, skipped all parameter updates"),
                    supergraph.graph_name.clone(),
                ));
            }
            let value: Value = serde_json::from_str(payload).map_err(|_| {
                BrandError::graph(
                    "JSONDecodeError: Redis strings should be single quotes (') and strings for JSON keys/values should be double quotes (\")",
                    supergraph.graph_name.clone(),
                )
            })?;
            let Value::Object(map) = value else {
                return Err(BrandError::graph(
                    format!("Parameter update for {nickname} must be a JSON object"),
                    supergraph.graph_name.clone(),
                ));
            };
            parsed.insert(nickname.clone(), map);
        }

        let next = supergraph.with_updated_parameters(&parsed);
        self.publish(store, &next).await?;
        self.append_graph_status(store, GraphStatus::Published, None, None).await;
        self.append_graph_status(store, GraphStatus::Running, None, None).await;
        self.current = Some(next);
        Ok(())
    }

    pub async fn save_rdb<S: StoreClient>(&self, store: &S) -> Result<(), BrandError> {
        store.snapshot().await
    }

    /// Runs the external `exportNWB` derivative against the most recently
    /// saved RDB file. Rejected while the graph is still running, matching
    /// the reference implementation's `check_graph_not_running`.
    pub async fn save_nwb<S: StoreClient>(&self, store: &S) -> Result<(), BrandError> {
        self.check_graph_not_running(store).await?;
        let output = self.run_export_nwb().await?;
        self.classify_nwb_output(output)
    }

    /// `stopGraph` followed by a snapshot, an NWB export, and a flush to a
    /// fresh idle RDB file.
    pub async fn stop_graph_and_save_nwb<S: StoreClient>(&mut self, store: &S, now: DateTime<Utc>) -> Result<(), BrandError> {
        self.stop_graph(store).await?;
        store.snapshot().await?;
        let output = self.run_export_nwb().await?;
        self.classify_nwb_output(output)?;
        self.rotate_to_idle(store, now).await
    }

    pub async fn flush_db<S: StoreClient>(&mut self, store: &S, now: DateTime<Utc>) -> Result<(), BrandError> {
        store.flush().await?;
        self.rotate_to_idle(store, now).await
    }

    pub fn set_data_dir(&mut self, path: Option<String>) {
        if let Some(path) = path {
            self.config.data_dir = PathBuf::from(path);
        }
    }

    /// Runs `make` in the project directory, matching the Booter's own `make`
    /// handling, and fans the same command out to every Booter.
    pub async fn make<S: StoreClient>(&self, store: &S) -> Result<(), BrandError> {
        store.append(Stream::Booter.as_str(), BooterCommand::Make.to_fields()).await?;

        let output = tokio::process::Command::new("make")
            .current_dir(&self.config.project_dir)
            .output()
            .await?;
        match output.status.code() {
            Some(0) => Ok(()),
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
            None => Ok(()),
        }
    }

    /// One-shot exclusive-start poll of `booter_status`, raising on the first
    /// fault entry found and otherwise advancing the cursor to the last entry
    /// read — matching `Supervisor.checkBooter` exactly, including the detail
    /// that the cursor lands on the *faulting* entry's id (not the batch's
    /// last id) when a fault is found, so the same entry is never re-raised.
    pub async fn poll_booter_status<S: StoreClient>(&mut self, store: &S) -> Result<(), BrandError> {
        let entries = store
            .read_range(Stream::BooterStatus.as_str(), &format!("({}", self.booter_status_id), "+", None)
            .await?;
        if entries.is_empty() {
            return Ok(());
        }

        for entry in &entries {
            let status = entry.fields.get("status").map(String::as_str).unwrap_or_default();
            let source_kind = match status {
                "GraphError" => Some(BooterSourceKind::Graph),
                "NodeError" => Some(BooterSourceKind::Node),
                "CommandError" => Some(BooterSourceKind::Command),
                _ => None,
            };
            if let Some(source_kind) = source_kind {
                self.booter_status_id = entry.id.clone();
                return Err(BrandError::Booter {
                    message: entry.fields.get("message").cloned().unwrap_or_default(),
                    machine: entry.fields.get("machine").cloned().unwrap_or_default(),
                    graph: self.graph_name().map(str::to_string),
                    booter_traceback: entry.fields.get("traceback").cloned().unwrap_or_default(),
                    source_kind,
                });
            }
        }

        if let Some(last) = entries.last() {
            self.booter_status_id = last.id.clone();
        }
        Ok(())
    }

    async fn check_graph_not_running<S: StoreClient>(&self, store: &S) -> Result<(), BrandError> {
        let last = store.read_reverse(Stream::GraphStatus.as_str(), 1).await?;
        let status = last
            .first()
            .and_then(|entry| entry.fields.get("status"))
            .and_then(|s| s.parse::<GraphStatus>().ok());
        if status == Some(GraphStatus::Running) {
            return Err(BrandError::command(
                "Cannot save NWB data while the graph is still running",
                "supervisor",
                "saveNwb",
                "graph is running",
            ));
        }
        Ok(())
    }

    async fn run_export_nwb(&self) -> Result<std::process::Output, BrandError> {
        let save_path = self.save_path.clone().unwrap_or_else(|| self.config.data_dir.clone());
        let save_path_nwb = save_path.join("NWB");
        std::fs::create_dir_all(&save_path_nwb)?;
        let rdb_filename = self.rdb_filename.clone().unwrap_or_default();

        let output = tokio::process::Command::new("python")
            .arg("derivatives/exportNWB/exportNWB.py")
            .arg(&rdb_filename)
            .arg(&self.config.redis_host)
            .arg(self.config.redis_port.to_string())
            .arg(&save_path_nwb)
            .current_dir(&self.config.project_dir)
            .output()
            .await?;
        Ok(output)
    }

    fn classify_nwb_output(&self, output: std::process::Output) -> Result<(), BrandError> {
        use std::os::unix::process::ExitStatusExt;

        if !output.stdout.is_empty() {
            tracing::debug!("{}", String::from_utf8_lossy(&output.stdout));
        }
        match output.status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(BrandError::Derivative {
                message: format!("exportNWB returned exit code {code}."),
                derivative: "exportNWB".to_string(),
                graph: self.graph_name().map(str::to_string),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
            None => {
                let signal = output.status.signal().unwrap_or(0);
                warn!("exportNWB was halted during execution with signal {signal}");
                Ok(())
            }
        }
    }

    async fn rotate_to_idle<S: StoreClient>(&mut self, store: &S, now: DateTime<Utc>) -> Result<(), BrandError> {
        let filename = paths::idle_filename(now);
        store.set_config("dbfilename", &filename).await?;
        self.rdb_filename = Some(filename);
        self.append_graph_status(store, GraphStatus::Stopped, None, None).await;
        Ok(())
    }

    async fn publish<S: StoreClient>(&self, store: &S, supergraph: &Supergraph) -> Result<(), BrandError> {
        let mut fields = StreamFields::new();
        fields.insert("data".to_string(), serde_json::to_string(supergraph).unwrap_or_default());
        store.append(Stream::SupergraphStream.as_str(), fields).await?;
        Ok(())
    }

    async fn append_graph_status<S: StoreClient>(
        &self,
        store: &S,
        status: GraphStatus,
        message: Option<String>,
        traceback: Option<String>,
    ) {
        let event = match (message, traceback) {
            (Some(message), Some(traceback)) => brand_wire::GraphStatusEvent::failed(status, message, traceback),
            _ => brand_wire::GraphStatusEvent::ok(status),
        };
        if let Err(err) = store.append(Stream::GraphStatus.as_str(), event.to_fields()).await {
            warn!("failed to append graph_status: {err}");
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
