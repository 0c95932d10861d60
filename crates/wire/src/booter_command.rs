// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands broadcast on the `booter` stream, keyed by the singular `command`
//! field. Every booter reads every entry; each decides locally which nodes in
//! the attached supergraph are its own to start.

use brand_core::{BrandError, Supergraph};

use crate::fields::StreamFields;

#[derive(Debug, Clone, PartialEq)]
pub enum BooterCommand {
    /// `graph` carries the full supergraph JSON, not just this machine's slice
    /// — the booter filters to its own nodes via [`Supergraph::local_nodes`].
    StartGraph { supergraph: Supergraph },
    StopGraph,
    Make,
}

impl BooterCommand {
    pub fn parse(fields: &StreamFields) -> Result<Option<Self>, BrandError> {
        let cmd = fields
            .get("command")
            .ok_or_else(|| BrandError::Unhandled {
                message: "booter stream entry missing 'command' field".to_string(),
            })?
            .as_str();

        Ok(match cmd {
            "startGraph" => {
                let graph = fields.get("graph").ok_or_else(|| BrandError::Booter {
                    message: "startGraph command missing 'graph' field".to_string(),
                    machine: String::new(),
                    graph: None,
                    booter_traceback: String::new(),
                    source_kind: brand_core::BooterSourceKind::Command,
                })?;
                let supergraph: Supergraph = serde_json::from_str(graph).map_err(|err| BrandError::Booter {
                    message: format!("could not parse supergraph: {err}"),
                    machine: String::new(),
                    graph: None,
                    booter_traceback: String::new(),
                    source_kind: brand_core::BooterSourceKind::Command,
                })?;
                Some(Self::StartGraph { supergraph })
            }
            "stopGraph" => Some(Self::StopGraph),
            "make" => Some(Self::Make),
            _ => None,
        })
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::StartGraph { .. } => "startGraph",
            Self::StopGraph => "stopGraph",
            Self::Make => "make",
        }
    }

    pub fn to_fields(&self) -> StreamFields {
        let mut fields = StreamFields::new();
        fields.insert("command".to_string(), self.verb().to_string());
        if let Self::StartGraph { supergraph } = self {
            fields.insert(
                "graph".to_string(),
                serde_json::to_string(supergraph).unwrap_or_default(),
            );
        }
        fields
    }
}

#[cfg(test)]
#[path = "booter_command_tests.rs"]
mod tests;
