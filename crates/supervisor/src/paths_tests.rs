use chrono::TimeZone;

use super::*;

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 28, 14, 5, 0).unwrap()
}

#[test]
fn save_path_defaults_participant_id_to_zero_without_metadata() {
    let path = save_path(Path::new("/data"), None, fixed_time());
    assert_eq!(path, Path::new("/data/0/2026-07-28/RawData"));
}

#[test]
fn save_path_uses_inline_participant_id() {
    let metadata = MetadataDocument {
        participant_file: None,
        participant_id: Some(serde_json::json!(7)),
        extra: serde_json::Map::new(),
    };
    let path = save_path(Path::new("/data"), Some(&metadata), fixed_time());
    assert_eq!(path, Path::new("/data/7/2026-07-28/RawData"));
}

#[test]
fn rdb_dir_appends_rdb_segment() {
    let path = rdb_dir(Path::new("/data/0/2026-07-28/RawData"));
    assert_eq!(path, Path::new("/data/0/2026-07-28/RawData/RDB"));
}

#[test]
fn snapshot_filename_uses_participant_segment_and_timestamp() {
    let save_path = Path::new("/data/7/2026-07-28/RawData");
    let name = snapshot_filename(save_path, "demo", fixed_time());
    assert_eq!(name, "7_260728T1405_demo.rdb");
}

#[test]
fn idle_filename_has_no_graph_name() {
    assert_eq!(idle_filename(fixed_time()), "idle_260728T1405.rdb");
}
