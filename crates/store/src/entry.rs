// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use brand_wire::StreamFields;

/// One entry read back from a stream: its id plus field map.
///
/// Entry ids are lexicographically orderable strings of the form
/// `<ms>-<seq>`; `"0-0"` is the beginning of a stream and `"$"` (used only as
/// a `read_tail` cursor, never returned as an id) means "only entries after
/// now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEntry {
    pub id: String,
    pub fields: StreamFields,
}

impl StreamEntry {
    pub fn new(id: impl Into<String>, fields: StreamFields) -> Self {
        Self { id: id.into(), fields }
    }
}
