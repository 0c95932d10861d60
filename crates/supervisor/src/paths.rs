// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Save-path computation for RDB/NWB snapshots, matching
//! `Supervisor.get_save_path` in the reference implementation.

use std::path::{Path, PathBuf};

use brand_core::MetadataDocument;
use chrono::{DateTime, Utc};

/// `<data_dir>/<participant_id>/<YYYY-MM-DD>/RawData`, with `participant_id`
/// read from a linked participant file if present, from `metadata.participant_id`
/// otherwise, and defaulting to `0` when no metadata block exists at all.
pub fn save_path(data_dir: &Path, metadata: Option<&MetadataDocument>, today: DateTime<Utc>) -> PathBuf {
    let participant_id = participant_id(metadata);
    let session_id = today.format("%Y-%m-%d").to_string();
    data_dir.join(participant_id).join(session_id).join("RawData")
}

fn participant_id(metadata: Option<&MetadataDocument>) -> String {
    let Some(metadata) = metadata else { return "0".to_string() };

    if let Some(path) = &metadata.participant_file {
        if let Ok(text) = std::fs::read_to_string(path) {
            if let Ok(doc) = serde_yaml::from_str::<serde_json::Value>(&text) {
                if let Some(id) = doc.pointer("/metadata/participant_id") {
                    return value_to_string(id);
                }
            }
        }
    }

    match &metadata.participant_id {
        Some(id) => value_to_string(id),
        None => "0".to_string(),
    }
}

fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `<save_path>/RDB`.
pub fn rdb_dir(save_path: &Path) -> PathBuf {
    save_path.join("RDB")
}

/// `<participant_id>_<YYMMDDTHHMM>_<graph_name>.rdb`, where `participant_id` is
/// the save path's grandparent directory name (matching the reference
/// implementation's `save_path.split(sep)[-3]`).
pub fn snapshot_filename(save_path: &Path, graph_name: &str, now: DateTime<Utc>) -> String {
    let participant_id = save_path
        .parent()
        .and_then(Path::parent)
        .and_then(|p| p.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "0".to_string());
    format!("{participant_id}_{}_{graph_name}.rdb", now.format("%y%m%dT%H%M"))
}

/// `idle_<YYMMDDTHHMM>.rdb`, used after `flushDb`/`stopGraphAndSaveNwb` rotate
/// away from a graph-specific filename.
pub fn idle_filename(now: DateTime<Utc>) -> String {
    format!("idle_{}.rdb", now.format("%y%m%dT%H%M"))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
