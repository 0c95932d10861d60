use std::time::Duration;

use super::*;

#[test]
fn spawn_and_check_liveness() {
    let mut sup = ProcessSupervisor::new();
    sup.spawn("sleeper", &["/bin/sh".to_string(), "-c".to_string(), "sleep 5".to_string()])
        .unwrap();
    assert!(sup.is_alive("sleeper"));
    assert_eq!(sup.nicknames().collect::<Vec<_>>(), vec!["sleeper"]);
}

#[test]
fn spawn_rejects_empty_argv() {
    let mut sup = ProcessSupervisor::new();
    let err = sup.spawn("nothing", &[]).unwrap_err();
    assert_eq!(err.status_label(), "NodeError");
}

#[tokio::test]
async fn terminate_all_reaps_a_process_that_honors_sigint() {
    let mut sup = ProcessSupervisor::with_stage_timeout(Duration::from_millis(500));
    sup.spawn("cooperative", &["/bin/sh".to_string(), "-c".to_string(), "sleep 30".to_string()])
        .unwrap();

    let report = sup.terminate_all().await;
    assert!(report.stuck.is_empty());
}

#[tokio::test]
async fn terminate_all_escalates_to_sigkill_and_reports_stuck() {
    let mut sup = ProcessSupervisor::with_stage_timeout(Duration::from_millis(100));
    sup.spawn(
        "stubborn",
        &[
            "/bin/sh".to_string(),
            "-c".to_string(),
            "trap '' INT; sleep 30".to_string(),
        ],
    )
    .unwrap();

    let report = sup.terminate_all().await;
    // SIGINT is ignored, so the process is reaped by the SIGKILL stage and
    // should not remain stuck.
    assert!(report.stuck.is_empty());
}

#[tokio::test]
async fn terminate_all_skips_already_gone_children() {
    let mut sup = ProcessSupervisor::with_stage_timeout(Duration::from_millis(100));
    sup.spawn("quick", &["/bin/sh".to_string(), "-c".to_string(), "true".to_string()])
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let report = sup.terminate_all().await;
    assert!(report.stuck.is_empty());
}
