// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed views over the three status streams: `graph_status`, `booter_status`,
//! and `supervisor_status`. Every entry carries at least a `status` field;
//! `message`/`traceback` are present only on failure.

use brand_core::GraphStatus;

use crate::fields::StreamFields;

/// An entry on the `graph_status` stream.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStatusEvent {
    pub status: GraphStatus,
    pub message: Option<String>,
    pub traceback: Option<String>,
}

impl GraphStatusEvent {
    pub fn ok(status: GraphStatus) -> Self {
        Self { status, message: None, traceback: None }
    }

    pub fn failed(status: GraphStatus, message: impl Into<String>, traceback: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            traceback: Some(traceback.into()),
        }
    }

    pub fn to_fields(&self) -> StreamFields {
        let mut fields = StreamFields::new();
        fields.insert("status".to_string(), self.status.to_string());
        if let Some(message) = &self.message {
            fields.insert("message".to_string(), message.clone());
        }
        if let Some(traceback) = &self.traceback {
            fields.insert("traceback".to_string(), traceback.clone());
        }
        fields
    }

    pub fn from_fields(fields: &StreamFields) -> Option<Self> {
        let status: GraphStatus = fields.get("status")?.parse().ok()?;
        Some(Self {
            status,
            message: fields.get("message").cloned(),
            traceback: fields.get("traceback").cloned(),
        })
    }
}

/// An entry on the `supervisor_status` stream. Separate type from
/// [`GraphStatusEvent`] even though the shape is identical, since the two
/// streams are not interchangeable and carry different status vocabularies
/// over time (the coordinator also writes plain operational messages here,
/// e.g. on shutdown).
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisorStatusEvent {
    pub status: String,
    pub message: Option<String>,
    pub traceback: Option<String>,
}

impl SupervisorStatusEvent {
    pub fn new(status: impl Into<String>) -> Self {
        Self { status: status.into(), message: None, traceback: None }
    }

    pub fn failed(status: impl Into<String>, message: impl Into<String>, traceback: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: Some(message.into()),
            traceback: Some(traceback.into()),
        }
    }

    pub fn to_fields(&self) -> StreamFields {
        let mut fields = StreamFields::new();
        fields.insert("status".to_string(), self.status.clone());
        if let Some(message) = &self.message {
            fields.insert("message".to_string(), message.clone());
        }
        if let Some(traceback) = &self.traceback {
            fields.insert("traceback".to_string(), traceback.clone());
        }
        fields
    }

    pub fn from_fields(fields: &StreamFields) -> Option<Self> {
        Some(Self {
            status: fields.get("status")?.clone(),
            message: fields.get("message").cloned(),
            traceback: fields.get("traceback").cloned(),
        })
    }
}

/// An entry on the `booter_status` stream. Unlike the other two, every entry
/// is tagged with the reporting machine's hostname so the coordinator can
/// tell booters apart on a shared stream.
#[derive(Debug, Clone, PartialEq)]
pub struct BooterStatusEvent {
    pub machine: String,
    pub status: String,
    pub message: Option<String>,
    pub traceback: Option<String>,
}

impl BooterStatusEvent {
    pub fn new(machine: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            machine: machine.into(),
            status: status.into(),
            message: None,
            traceback: None,
        }
    }

    pub fn failed(
        machine: impl Into<String>,
        status: impl Into<String>,
        message: impl Into<String>,
        traceback: impl Into<String>,
    ) -> Self {
        Self {
            machine: machine.into(),
            status: status.into(),
            message: Some(message.into()),
            traceback: Some(traceback.into()),
        }
    }

    pub fn to_fields(&self) -> StreamFields {
        let mut fields = StreamFields::new();
        fields.insert("machine".to_string(), self.machine.clone());
        fields.insert("status".to_string(), self.status.clone());
        if let Some(message) = &self.message {
            fields.insert("message".to_string(), message.clone());
        }
        if let Some(traceback) = &self.traceback {
            fields.insert("traceback".to_string(), traceback.clone());
        }
        fields
    }

    pub fn from_fields(fields: &StreamFields) -> Option<Self> {
        Some(Self {
            machine: fields.get("machine")?.clone(),
            status: fields.get("status")?.clone(),
            message: fields.get("message").cloned(),
            traceback: fields.get("traceback").cloned(),
        })
    }
}

#[cfg(test)]
#[path = "status_event_tests.rs"]
mod tests;
