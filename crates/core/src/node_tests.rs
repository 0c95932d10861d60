use super::*;

fn node(nickname: &str, machine: Option<&str>) -> ResolvedNode {
    ResolvedNode {
        nickname: nickname.to_string(),
        name: nickname.to_string(),
        module: "mod".to_string(),
        machine: machine.map(str::to_string),
        run_priority: None,
        cpu_affinity: None,
        parameters: Map::new(),
        binary: "/bin/x".to_string(),
        git_hash: String::new(),
        extra: Map::new(),
    }
}

#[test]
fn node_with_no_machine_targets_everywhere() {
    let n = node("a", None);
    assert!(n.targets(None));
    assert!(n.targets(Some("m2")));
}

#[test]
fn node_with_machine_targets_only_that_machine() {
    let n = node("a", Some("m2"));
    assert!(n.targets(Some("m2")));
    assert!(!n.targets(Some("m1")));
    assert!(!n.targets(None));
}

#[test]
fn derivative_spec_exposes_script_path_from_extra() {
    let mut extra = Map::new();
    extra.insert(
        "script_path".to_string(),
        Value::String("derivatives/x.py".to_string()),
    );
    let spec = DerivativeSpec {
        git_hash: String::new(),
        extra,
    };
    assert_eq!(spec.script_path(), Some("derivatives/x.py"));
}
