use super::*;
use std::io::Write;

#[test]
fn parses_minimal_document_from_yaml() {
    let yaml = "\
graph_name: ignored_when_loaded_from_file
nodes:
  - nickname: a
    name: alpha
    module: mod_a
";
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("my_graph.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{yaml}").unwrap();

    let doc = GraphDocument::from_yaml_file(&path).unwrap();
    assert_eq!(doc.graph_name, "my_graph");
    assert_eq!(doc.nodes.len(), 1);
    assert_eq!(doc.nodes[0].nickname, "a");
}

#[test]
fn missing_file_is_a_graph_error() {
    let err = GraphDocument::from_yaml_file(Path::new("/no/such/graph.yaml")).unwrap_err();
    matches!(err, BrandError::Graph { .. });
}

#[test]
fn malformed_yaml_is_a_graph_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "not: [valid yaml").unwrap();
    let err = GraphDocument::from_yaml_file(file.path()).unwrap_err();
    matches!(err, BrandError::Graph { .. });
}

#[test]
fn derivative_document_requires_single_key() {
    let value: Value = serde_json::json!({"a": {}, "b": {}});
    let result: Result<DerivativeDocument, _> = serde_json::from_value(value);
    assert!(result.is_err());
}

#[test]
fn derivative_document_exposes_script_path() {
    let value: Value = serde_json::json!({"exportNWB": {"script_path": "derivatives/exportNWB/exportNWB.py"}});
    let doc: DerivativeDocument = serde_json::from_value(value).unwrap();
    assert_eq!(doc.name, "exportNWB");
    assert_eq!(
        doc.script_path(),
        Some("derivatives/exportNWB/exportNWB.py")
    );
}

#[test]
fn unknown_node_fields_are_preserved() {
    let value: Value = serde_json::json!({
        "nickname": "a",
        "name": "alpha",
        "module": "mod_a",
        "custom_field": "kept"
    });
    let doc: NodeDocument = serde_json::from_value(value).unwrap();
    assert_eq!(
        doc.extra.get("custom_field"),
        Some(&Value::String("kept".to_string()))
    );
}
