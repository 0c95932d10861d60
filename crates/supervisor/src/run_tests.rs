use brand_core::test_support::{touch_executable, write_sidecar, NoVcs};
use brand_core::resolve_binary_path;
use brand_store::fake::FakeStoreClient;
use brand_wire::{GraphSource, Stream, SupervisorCommand};
use tempfile::tempdir;

use super::*;
use crate::lifecycle::LifecycleConfig;

fn inline_graph(binary_dir: &std::path::Path) -> GraphSource {
    let binary = resolve_binary_path(binary_dir, "decoding", "n1");
    touch_executable(&binary);
    write_sidecar(&binary, "abc123");

    GraphSource::Inline(serde_json::json!({
        "graph_name": "demo",
        "nodes": [{"nickname": "n1", "name": "n1", "module": "decoding"}]
    }))
}

fn lifecycle<'a>(binary_dir: &std::path::Path, data_dir: &std::path::Path, vcs: &'a NoVcs) -> Lifecycle<'a> {
    Lifecycle::new(
        LifecycleConfig {
            binary_dir: binary_dir.to_path_buf(),
            data_dir: data_dir.to_path_buf(),
            project_dir: data_dir.to_path_buf(),
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            machine: None,
            brand_hash: "brandhash".to_string(),
        },
        vcs,
    )
}

#[tokio::test]
async fn dispatch_rejects_loadgraph_while_running() {
    let binary_dir = tempdir().unwrap();
    let data_dir = tempdir().unwrap();
    let vcs = NoVcs;
    let mut lc = lifecycle(binary_dir.path(), data_dir.path(), &vcs);
    let store = FakeStoreClient::new();

    let source = inline_graph(binary_dir.path());
    dispatch(&store, &mut lc, SupervisorCommand::StartGraph { source: Some(source), rdb_filename: None })
        .await
        .unwrap();

    let another = inline_graph(binary_dir.path());
    let err = dispatch(&store, &mut lc, SupervisorCommand::LoadGraph { source: another, rdb_filename: None })
        .await
        .unwrap_err();
    assert_eq!(err.status_label(), "GraphError");

    lc.process.terminate_all().await;
}

#[tokio::test]
async fn tick_advances_cursor_and_dispatches_stopgraph() {
    let binary_dir = tempdir().unwrap();
    let data_dir = tempdir().unwrap();
    let vcs = NoVcs;
    let mut lc = lifecycle(binary_dir.path(), data_dir.path(), &vcs);
    let store = FakeStoreClient::new();

    let source = inline_graph(binary_dir.path());
    lc.start_graph(&store, Some(source), None, chrono::Utc::now()).await.unwrap();

    let mut last_id = "0-0".to_string();
    store.append(Stream::SupervisorIpstream.as_str(), SupervisorCommand::StopGraph.to_fields()).await.unwrap();

    tick(&store, &mut lc, &mut last_id).await.unwrap();

    assert_ne!(last_id, "0-0");
    assert!(!lc.process.is_alive("n1"));
    let statuses = store.entries(Stream::GraphStatus.as_str());
    assert_eq!(statuses.last().unwrap().fields.get("status").unwrap(), "stopped/not initialized");
}

#[tokio::test]
async fn tick_reports_invalid_entry_missing_commands_field() {
    let binary_dir = tempdir().unwrap();
    let data_dir = tempdir().unwrap();
    let vcs = NoVcs;
    let mut lc = lifecycle(binary_dir.path(), data_dir.path(), &vcs);
    let store = FakeStoreClient::new();

    let mut last_id = "0-0".to_string();
    store.append(Stream::SupervisorIpstream.as_str(), brand_wire::StreamFields::new()).await.unwrap();
    tick(&store, &mut lc, &mut last_id).await.unwrap();

    let statuses = store.entries(Stream::SupervisorStatus.as_str());
    assert_eq!(statuses[0].fields.get("status").unwrap(), "Invalid supervisor_ipstream entry");
}

#[tokio::test]
async fn handle_command_error_reports_command_error_and_resumes_listening() {
    let binary_dir = tempdir().unwrap();
    let data_dir = tempdir().unwrap();
    let vcs = NoVcs;
    let mut lc = lifecycle(binary_dir.path(), data_dir.path(), &vcs);
    let store = FakeStoreClient::new();

    let err = BrandError::command("make failed", "make", "make", "exit code 1");
    handle_command_error(&store, &mut lc, err).await;

    let statuses = store.entries(Stream::SupervisorStatus.as_str());
    assert_eq!(statuses[0].fields.get("status").unwrap(), "Command error");
    assert_eq!(statuses[1].fields.get("status").unwrap(), "Listening for commands");
}

#[tokio::test]
async fn handle_booter_error_with_command_source_does_not_stop_graph() {
    let binary_dir = tempdir().unwrap();
    let data_dir = tempdir().unwrap();
    let vcs = NoVcs;
    let mut lc = lifecycle(binary_dir.path(), data_dir.path(), &vcs);
    let store = FakeStoreClient::new();

    let source = inline_graph(binary_dir.path());
    lc.start_graph(&store, Some(source), None, chrono::Utc::now()).await.unwrap();

    let err = BrandError::Booter {
        message: "make failed on rig-1".to_string(),
        machine: "rig-1".to_string(),
        graph: Some("demo".to_string()),
        booter_traceback: String::new(),
        source_kind: BooterSourceKind::Command,
    };
    handle_booter_error(&store, &mut lc, err).await;

    assert!(lc.process.is_alive("n1"));
    let statuses = store.entries(Stream::SupervisorStatus.as_str());
    assert_eq!(statuses.last().unwrap().fields.get("status").unwrap(), "CommandError");

    lc.process.terminate_all().await;
}

#[tokio::test]
async fn handle_booter_error_with_node_source_stops_graph() {
    let binary_dir = tempdir().unwrap();
    let data_dir = tempdir().unwrap();
    let vcs = NoVcs;
    let mut lc = lifecycle(binary_dir.path(), data_dir.path(), &vcs);
    let store = FakeStoreClient::new();

    let source = inline_graph(binary_dir.path());
    lc.start_graph(&store, Some(source), None, chrono::Utc::now()).await.unwrap();

    let err = BrandError::Booter {
        message: "n1 node crashed".to_string(),
        machine: "rig-1".to_string(),
        graph: Some("demo".to_string()),
        booter_traceback: String::new(),
        source_kind: BooterSourceKind::Node,
    };
    handle_booter_error(&store, &mut lc, err).await;

    assert!(!lc.process.is_alive("n1"));
    let statuses = store.entries(Stream::GraphStatus.as_str());
    assert_eq!(statuses.last().unwrap().fields.get("status").unwrap(), "stopped/not initialized");
}
