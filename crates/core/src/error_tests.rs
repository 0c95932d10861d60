use super::*;

#[test]
fn status_labels_match_reference_vocabulary() {
    assert_eq!(BrandError::graph("bad", "g").status_label(), "GraphError");
    assert_eq!(
        BrandError::node("bad", "g", "n").status_label(),
        "NodeError"
    );
    assert_eq!(
        BrandError::command("bad", "p", "c", "d").status_label(),
        "CommandError"
    );
    assert_eq!(
        BrandError::Store {
            message: "down".into()
        }
        .status_label(),
        "RedisError"
    );
    assert_eq!(
        BrandError::Unhandled {
            message: "???".into()
        }
        .status_label(),
        "Unhandled exception"
    );
}

#[test]
fn only_store_errors_are_fatal_to_process() {
    assert!(BrandError::Store {
        message: "down".into()
    }
    .is_fatal_to_process());
    assert!(!BrandError::graph("bad", "g").is_fatal_to_process());
    assert!(!BrandError::node("bad", "g", "n").is_fatal_to_process());
}

#[test]
fn booter_source_kind_display_matches_reference_class_names() {
    assert_eq!(BooterSourceKind::Graph.to_string(), "GraphError");
    assert_eq!(BooterSourceKind::Node.to_string(), "NodeError");
    assert_eq!(BooterSourceKind::Command.to_string(), "CommandError");
    assert_eq!(BooterSourceKind::Other.to_string(), "Unhandled exception");
}
