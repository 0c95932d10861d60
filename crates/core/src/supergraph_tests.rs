use super::*;
use crate::node::ResolvedNode;
use serde_json::Map;

fn sample() -> Supergraph {
    let mut nodes = BTreeMap::new();
    nodes.insert(
        "a".to_string(),
        ResolvedNode {
            nickname: "a".to_string(),
            name: "alpha".to_string(),
            module: "mod_a".to_string(),
            machine: None,
            run_priority: None,
            cpu_affinity: None,
            parameters: Map::new(),
            binary: "/abs/mod_a/nodes/alpha/alpha.bin".to_string(),
            git_hash: "deadbeef".to_string(),
            extra: Map::new(),
        },
    );
    Supergraph {
        redis_host: "127.0.0.1".to_string(),
        redis_port: 6379,
        brand_hash: "cafebabe".to_string(),
        graph_name: "demo".to_string(),
        graph_loaded_ts: 1_000,
        nodes,
        derivatives: None,
    }
}

#[test]
fn round_trips_through_json() {
    let sg = sample();
    let json = serde_json::to_string(&sg).unwrap();
    let parsed: Supergraph = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, sg);
}

#[test]
fn round_trips_through_stream_payload() {
    let sg = sample();
    let payload = sg.to_stream_payload().unwrap();
    let parsed = Supergraph::from_stream_payload(&payload).unwrap();
    assert_eq!(parsed, sg);
}

#[test]
fn local_nodes_filters_by_machine() {
    let sg = sample();
    assert_eq!(sg.local_nodes(None).count(), 1);
    assert_eq!(sg.local_nodes(Some("m2")).count(), 1); // node has no machine: runs everywhere
}

#[test]
fn updating_parameters_touches_only_named_nodes() {
    let sg = sample();
    let mut updates = BTreeMap::new();
    let mut params = Map::new();
    params.insert("rate".to_string(), Value::from(200));
    updates.insert("a".to_string(), params);

    let updated = sg.with_updated_parameters(&updates);
    assert_eq!(
        updated.nodes["a"].parameters.get("rate"),
        Some(&Value::from(200))
    );
    assert_eq!(updated.graph_name, sg.graph_name);
    assert_eq!(updated.nodes["a"].binary, sg.nodes["a"].binary);
}
