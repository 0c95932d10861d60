// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use brand_core::BrandError;
use brand_wire::StreamFields;

use crate::entry::StreamEntry;

/// The narrow store interface every component depends on. Implemented by
/// [`crate::RedisStoreClient`] in production and by [`crate::fake::FakeStoreClient`]
/// in tests.
///
/// Connection loss is reported as `BrandError::Store` and is fatal to the
/// calling process — callers should let it propagate out of their command
/// loop and exit, not retry.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// `XADD stream * field value ...`. Returns the assigned entry id.
    async fn append(&self, stream: &str, fields: StreamFields) -> Result<String, BrandError>;

    /// Block up to `block_ms` for new entries on any of `streams`, each
    /// resumed from its paired last-seen id (`"$"` to start from "now",
    /// `"0-0"` from the beginning). Returns an empty vector on timeout — that
    /// is not an error.
    async fn read_tail(
        &self,
        streams: &[(&str, &str)],
        count: Option<usize>,
        block_ms: u64,
    ) -> Result<Vec<(String, Vec<StreamEntry>)>, BrandError>;

    /// `XRANGE stream start end [COUNT count]`. `start`/`end` accept the
    /// exclusive-start `(id` form.
    async fn read_range(
        &self,
        stream: &str,
        start: &str,
        end: &str,
        count: Option<usize>,
    ) -> Result<Vec<StreamEntry>, BrandError>;

    /// `XREVRANGE stream + - COUNT count`, newest first.
    async fn read_reverse(&self, stream: &str, count: usize) -> Result<Vec<StreamEntry>, BrandError>;

    /// `CONFIG SET key value`.
    async fn set_config(&self, key: &str, value: &str) -> Result<(), BrandError>;

    /// `SAVE` — synchronous RDB snapshot.
    async fn snapshot(&self) -> Result<(), BrandError>;

    /// `FLUSHDB`.
    async fn flush(&self) -> Result<(), BrandError>;
}
