// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A stream entry is a flat map of field name to string value. Every command
//! verb and status event in this crate is a typed view over one of these.

use std::collections::BTreeMap;

/// Field map for a single stream entry, as sent to `append` and received from
/// `read_tail`/`read_range`/`read_reverse`.
pub type StreamFields = BTreeMap<String, String>;
