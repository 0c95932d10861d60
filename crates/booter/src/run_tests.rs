use std::collections::BTreeMap;
use std::time::Duration;

use brand_core::test_support::{touch_executable, write_sidecar, NoVcs};
use brand_core::{resolve_binary_path, ResolvedNode, Supergraph};
use brand_store::fake::FakeStoreClient;
use brand_wire::{BooterCommand, Stream};
use tempfile::tempdir;

use super::*;

fn sample_supergraph(binary_dir: &std::path::Path, machine: &str) -> Supergraph {
    let binary = resolve_binary_path(binary_dir, "decoding", "reach_decoder");
    touch_executable(&binary);
    write_sidecar(&binary, "abc123");

    let mut nodes = BTreeMap::new();
    nodes.insert(
        "reach_decoder".to_string(),
        ResolvedNode {
            nickname: "reach_decoder".to_string(),
            name: "reach_decoder".to_string(),
            module: "decoding".to_string(),
            machine: Some(machine.to_string()),
            run_priority: None,
            cpu_affinity: None,
            parameters: serde_json::Map::new(),
            binary: binary.to_string_lossy().into_owned(),
            git_hash: "abc123".to_string(),
            extra: serde_json::Map::new(),
        },
    );

    Supergraph {
        redis_host: "localhost".to_string(),
        redis_port: 6379,
        brand_hash: "abc123".to_string(),
        graph_name: "demo".to_string(),
        graph_loaded_ts: 1,
        nodes,
        derivatives: None,
    }
}

#[tokio::test]
async fn startgraph_spawns_local_nodes_and_emits_status() {
    let dir = tempdir().unwrap();
    let supergraph = sample_supergraph(dir.path(), "rig-1");

    let store = FakeStoreClient::new();
    let vcs = NoVcs;
    let ctx = BooterContext {
        machine: "rig-1",
        binary_dir: dir.path(),
        project_dir: dir.path(),
        vcs: &vcs,
    };
    let mut supervisor = ProcessSupervisor::new();
    let mut current_graph_name = String::new();

    let command = BooterCommand::StartGraph { supergraph };
    handle_command(&store, &ctx, &mut supervisor, &mut current_graph_name, command)
        .await
        .unwrap();

    assert_eq!(current_graph_name, "demo");
    assert!(supervisor.is_alive("reach_decoder"));

    let statuses = store.entries(Stream::BooterStatus.as_str());
    assert_eq!(statuses.len(), 1);
    assert_eq!(
        statuses[0].fields.get("status").unwrap(),
        "demo graph started successfully"
    );

    supervisor.terminate_all().await;
}

#[tokio::test]
async fn startgraph_rejects_missing_binary() {
    let dir = tempdir().unwrap();
    let mut nodes = BTreeMap::new();
    nodes.insert(
        "ghost".to_string(),
        ResolvedNode {
            nickname: "ghost".to_string(),
            name: "ghost".to_string(),
            module: "decoding".to_string(),
            machine: None,
            run_priority: None,
            cpu_affinity: None,
            parameters: serde_json::Map::new(),
            binary: String::new(),
            git_hash: String::new(),
            extra: serde_json::Map::new(),
        },
    );
    let supergraph = Supergraph {
        redis_host: "localhost".to_string(),
        redis_port: 6379,
        brand_hash: String::new(),
        graph_name: "demo".to_string(),
        graph_loaded_ts: 1,
        nodes,
        derivatives: None,
    };

    let store = FakeStoreClient::new();
    let vcs = NoVcs;
    let ctx = BooterContext { machine: "rig-1", binary_dir: dir.path(), project_dir: dir.path(), vcs: &vcs };
    let mut supervisor = ProcessSupervisor::new();
    let mut current_graph_name = String::new();

    let command = BooterCommand::StartGraph { supergraph };
    let err = handle_command(&store, &ctx, &mut supervisor, &mut current_graph_name, command)
        .await
        .unwrap_err();
    assert_eq!(err.status_label(), "NodeError");
}

#[tokio::test]
async fn stopgraph_terminates_children_and_emits_status() {
    let dir = tempdir().unwrap();
    let supergraph = sample_supergraph(dir.path(), "rig-1");

    let store = FakeStoreClient::new();
    let vcs = NoVcs;
    let ctx = BooterContext { machine: "rig-1", binary_dir: dir.path(), project_dir: dir.path(), vcs: &vcs };
    let mut supervisor = ProcessSupervisor::with_stage_timeout(Duration::from_millis(200));
    let mut current_graph_name = String::new();

    handle_command(
        &store,
        &ctx,
        &mut supervisor,
        &mut current_graph_name,
        BooterCommand::StartGraph { supergraph },
    )
    .await
    .unwrap();

    handle_command(&store, &ctx, &mut supervisor, &mut current_graph_name, BooterCommand::StopGraph)
        .await
        .unwrap();

    let statuses = store.entries(Stream::BooterStatus.as_str());
    assert_eq!(statuses.last().unwrap().fields.get("status").unwrap(), "demo graph stopped successfully");
}

#[tokio::test]
async fn make_success_emits_status() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("Makefile"),
        "all:\n\t@true\n",
    )
    .unwrap();

    let store = FakeStoreClient::new();
    let vcs = NoVcs;
    let ctx = BooterContext { machine: "rig-1", binary_dir: dir.path(), project_dir: dir.path(), vcs: &vcs };

    run_make(&store, &ctx).await.unwrap();

    let statuses = store.entries(Stream::BooterStatus.as_str());
    assert_eq!(statuses[0].fields.get("status").unwrap(), "make succeeded");
}

#[tokio::test]
async fn make_failure_is_command_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("Makefile"), "all:\n\t@false\n").unwrap();

    let store = FakeStoreClient::new();
    let vcs = NoVcs;
    let ctx = BooterContext { machine: "rig-1", binary_dir: dir.path(), project_dir: dir.path(), vcs: &vcs };

    let err = run_make(&store, &ctx).await.unwrap_err();
    assert_eq!(err.status_label(), "CommandError");
}
