use super::*;

struct FixedVcs(Option<String>);
impl VcsQuery for FixedVcs {
    fn head_hash(&self, _dir: &Path) -> Option<String> {
        self.0.clone()
    }
}

#[test]
fn missing_sidecar_yields_empty_hash_and_warning() {
    let dir = tempfile::tempdir().unwrap();
    let result = reconcile_hash(&FixedVcs(None), dir.path(), "x node", None);
    assert_eq!(result.resolved, "");
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("git_hash.o"));
}

#[test]
fn sidecar_present_and_vcs_agrees_has_no_warnings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("git_hash.o"), "abc123\n").unwrap();
    let result = reconcile_hash(&FixedVcs(Some("abc123".to_string())), dir.path(), "x node", None);
    assert_eq!(result.resolved, "abc123");
    assert!(result.warnings.is_empty());
}

#[test]
fn sidecar_and_vcs_head_disagree_warns_but_uses_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("git_hash.o"), "abc123\n").unwrap();
    let result = reconcile_hash(&FixedVcs(Some("ffffff".to_string())), dir.path(), "x node", None);
    assert_eq!(result.resolved, "abc123");
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("remake"));
}

#[test]
fn non_vcs_directory_uses_sidecar_without_warning() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("git_hash.o"), "abc123\n").unwrap();
    let result = reconcile_hash(&FixedVcs(None), dir.path(), "x node", None);
    assert_eq!(result.resolved, "abc123");
    assert!(result.warnings.is_empty());
}

#[test]
fn previously_recorded_mismatch_warns() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("git_hash.o"), "abc123\n").unwrap();
    let result = reconcile_hash(&FixedVcs(None), dir.path(), "x node", Some("ffffff"));
    assert!(result.warnings.iter().any(|w| w.contains("does not match supergraph")));
}

#[test]
fn read_sidecar_hash_trims_and_takes_first_line() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("git_hash.o"), "  abc123  \nsecondline\n").unwrap();
    assert_eq!(read_sidecar_hash(dir.path()), Some("abc123".to_string()));
}
