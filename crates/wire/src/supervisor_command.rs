// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands accepted on `supervisor_ipstream`, keyed by the `commands` field
//! (case-insensitive), matching `Supervisor.parseCommands` in the reference
//! implementation.

use std::collections::BTreeMap;

use brand_core::BrandError;
use serde_json::Value;

use crate::fields::StreamFields;

/// Where to load a graph from, for `loadGraph`/`startGraph`.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphSource {
    /// `file`: a path to a YAML graph document.
    File(String),
    /// `graph`: an inline JSON-encoded graph document.
    Inline(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SupervisorCommand {
    LoadGraph {
        source: GraphSource,
        rdb_filename: Option<String>,
    },
    /// `source: None` means "start the already-loaded graph".
    StartGraph {
        source: Option<GraphSource>,
        rdb_filename: Option<String>,
    },
    StopGraph,
    /// One field per nickname to update, each a JSON-encoded `{param: value}`
    /// map, still encoded as a string (not yet parsed/validated).
    UpdateParameters { updates: BTreeMap<String, String> },
    SaveRdb,
    SaveNwb,
    StopGraphAndSaveNwb,
    FlushDb,
    SetDataDir { path: Option<String> },
    Make,
}

impl SupervisorCommand {
    /// Parse a `supervisor_ipstream` entry. Returns `Ok(None)` for an
    /// unrecognized verb — the reference implementation only logs a warning and
    /// keeps listening, it does not raise.
    pub fn parse(fields: &StreamFields) -> Result<Option<Self>, BrandError> {
        let cmd = fields
            .get("commands")
            .ok_or_else(|| BrandError::Unhandled {
                message: "supervisor_ipstream entry missing 'commands' field".to_string(),
            })?
            .to_lowercase();

        let rdb_filename = fields.get("rdb_filename").cloned();

        Ok(match cmd.as_str() {
            "loadgraph" | "startgraph" => {
                let source = Self::parse_source(fields)?;
                match (source, cmd.as_str()) {
                    (Some(source), "loadgraph") => Some(Self::LoadGraph { source, rdb_filename }),
                    (source, "loadgraph") if source.is_none() => {
                        return Err(BrandError::graph(
                            "Error loading graph, a graph YAML must be provided with the 'file' key or a graph dictionary must be provided with the 'graph' key",
                            "",
                        ));
                    }
                    (source, _) => Some(Self::StartGraph { source, rdb_filename }),
                }
            }
            "updateparameters" => {
                let updates = fields
                    .iter()
                    .filter(|(k, _)| k.as_str() != "commands")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                Some(Self::UpdateParameters { updates })
            }
            "stopgraph" => Some(Self::StopGraph),
            "stopgraphandsavenwb" => Some(Self::StopGraphAndSaveNwb),
            "saverdb" => Some(Self::SaveRdb),
            "savenwb" => Some(Self::SaveNwb),
            "flushdb" => Some(Self::FlushDb),
            "setdatadir" => Some(Self::SetDataDir {
                path: fields.get("path").cloned(),
            }),
            "make" => Some(Self::Make),
            _ => None,
        })
    }

    fn parse_source(fields: &StreamFields) -> Result<Option<GraphSource>, BrandError> {
        if let Some(file) = fields.get("file") {
            return Ok(Some(GraphSource::File(file.clone())));
        }
        if let Some(graph) = fields.get("graph") {
            let value: Value = serde_json::from_str(graph).map_err(|err| {
                BrandError::graph(format!("GraphError: {err}"), "")
            })?;
            return Ok(Some(GraphSource::Inline(value)));
        }
        Ok(None)
    }

    /// The `commands` verb this variant round-trips to.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::LoadGraph { .. } => "loadGraph",
            Self::StartGraph { .. } => "startGraph",
            Self::StopGraph => "stopGraph",
            Self::UpdateParameters { .. } => "updateParameters",
            Self::SaveRdb => "saveRdb",
            Self::SaveNwb => "saveNwb",
            Self::StopGraphAndSaveNwb => "stopGraphAndSaveNwb",
            Self::FlushDb => "flushDb",
            Self::SetDataDir { .. } => "setDataDir",
            Self::Make => "make",
        }
    }

    /// Encode back into a field map, e.g. to re-send `stopGraph` after a
    /// detected `NodeError`.
    pub fn to_fields(&self) -> StreamFields {
        let mut fields = StreamFields::new();
        fields.insert("commands".to_string(), self.verb().to_string());
        match self {
            Self::LoadGraph { source, rdb_filename } | Self::StartGraph { source: Some(source), rdb_filename } => {
                match source {
                    GraphSource::File(path) => {
                        fields.insert("file".to_string(), path.clone());
                    }
                    GraphSource::Inline(value) => {
                        fields.insert("graph".to_string(), value.to_string());
                    }
                }
                if let Some(rdb) = rdb_filename {
                    fields.insert("rdb_filename".to_string(), rdb.clone());
                }
            }
            Self::StartGraph { source: None, rdb_filename } => {
                if let Some(rdb) = rdb_filename {
                    fields.insert("rdb_filename".to_string(), rdb.clone());
                }
            }
            Self::UpdateParameters { updates } => {
                fields.extend(updates.clone());
            }
            Self::SetDataDir { path } => {
                if let Some(path) = path {
                    fields.insert("path".to_string(), path.clone());
                }
            }
            Self::StopGraph
            | Self::SaveRdb
            | Self::SaveNwb
            | Self::StopGraphAndSaveNwb
            | Self::FlushDb
            | Self::Make => {}
        }
        fields
    }
}

#[cfg(test)]
#[path = "supervisor_command_tests.rs"]
mod tests;
