use super::*;

#[test]
fn display_matches_reference_wire_strings() {
    assert_eq!(GraphStatus::Initialized.to_string(), "initialized");
    assert_eq!(GraphStatus::Parsing.to_string(), "parsing");
    assert_eq!(GraphStatus::GraphFailed.to_string(), "graph failed");
    assert_eq!(GraphStatus::Running.to_string(), "running");
    assert_eq!(GraphStatus::Published.to_string(), "published");
    assert_eq!(GraphStatus::Stopped.to_string(), "stopped/not initialized");
}

#[test]
fn round_trips_through_from_str() {
    for status in [
        GraphStatus::Initialized,
        GraphStatus::Parsing,
        GraphStatus::GraphFailed,
        GraphStatus::Running,
        GraphStatus::Published,
        GraphStatus::Stopped,
    ] {
        let parsed: GraphStatus = status.to_string().parse().unwrap();
        assert_eq!(parsed, status);
    }
}

#[test]
fn unrecognized_value_is_an_error() {
    assert!("bogus".parse::<GraphStatus>().is_err());
}

#[test]
fn terminal_statuses() {
    assert!(GraphStatus::Stopped.is_terminal());
    assert!(GraphStatus::GraphFailed.is_terminal());
    assert!(!GraphStatus::Running.is_terminal());
    assert!(!GraphStatus::Published.is_terminal());
}
