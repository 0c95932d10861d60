// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory [`StoreClient`] for tests that don't want a live store
//! dependency. Entry ids are monotonic `<counter>-0` strings; ordering
//! matches production but the format is not byte-identical to Redis's
//! `<ms>-<seq>` ids, which no caller inspects beyond ordering.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use brand_core::BrandError;
use brand_wire::StreamFields;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::client::StoreClient;
use crate::entry::StreamEntry;

#[derive(Default)]
pub struct FakeStoreClient {
    streams: Mutex<HashMap<String, Vec<StreamEntry>>>,
    config: Mutex<HashMap<String, String>>,
    counter: AtomicU64,
    notify: Notify,
    connected: std::sync::atomic::AtomicBool,
}

impl FakeStoreClient {
    pub fn new() -> Self {
        Self {
            connected: std::sync::atomic::AtomicBool::new(true),
            ..Default::default()
        }
    }

    /// Simulate connection loss: every subsequent call returns
    /// `BrandError::Store`.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    fn check_connected(&self) -> Result<(), BrandError> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BrandError::Store { message: "connection lost".to_string() })
        }
    }

    fn next_id(&self) -> String {
        format!("{}-0", self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn entries(&self, stream: &str) -> Vec<StreamEntry> {
        self.streams.lock().get(stream).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl StoreClient for FakeStoreClient {
    async fn append(&self, stream: &str, fields: StreamFields) -> Result<String, BrandError> {
        self.check_connected()?;
        let id = self.next_id();
        self.streams
            .lock()
            .entry(stream.to_string())
            .or_default()
            .push(StreamEntry::new(id.clone(), fields));
        self.notify.notify_waiters();
        Ok(id)
    }

    async fn read_tail(
        &self,
        streams: &[(&str, &str)],
        count: Option<usize>,
        block_ms: u64,
    ) -> Result<Vec<(String, Vec<StreamEntry>)>, BrandError> {
        // Resolve "$" to the last id already present in each stream once, up
        // front — a "$" cursor means "only entries appended after this call
        // begins", not "everything ever appended", so it must not be
        // re-resolved to a later snapshot on every poll of the loop below.
        let cursors: Vec<String> = streams
            .iter()
            .map(|(stream, after_id)| {
                if *after_id == "$" {
                    self.streams
                        .lock()
                        .get(*stream)
                        .and_then(|entries| entries.last())
                        .map(|e| e.id.clone())
                        .unwrap_or_else(|| "0-0".to_string())
                } else {
                    after_id.to_string()
                }
            })
            .collect();

        let deadline = tokio::time::Instant::now() + Duration::from_millis(block_ms);
        loop {
            self.check_connected()?;
            let mut result = Vec::new();
            for ((stream, _), cursor) in streams.iter().zip(&cursors) {
                let entries = self.streams.lock().get(*stream).cloned().unwrap_or_default();
                let mut matched: Vec<StreamEntry> = entries
                    .into_iter()
                    .filter(|e| cursor == "0-0" || id_after(&e.id, cursor))
                    .collect();
                if let Some(count) = count {
                    matched.truncate(count);
                }
                if !matched.is_empty() {
                    result.push((stream.to_string(), matched));
                }
            }
            if !result.is_empty() || block_ms == 0 {
                return Ok(result);
            }
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Ok(Vec::new());
            }
            let _ = tokio::time::timeout(remaining, self.notify.notified()).await;
            if tokio::time::Instant::now() >= deadline {
                return Ok(Vec::new());
            }
        }
    }

    async fn read_range(
        &self,
        stream: &str,
        start: &str,
        end: &str,
        count: Option<usize>,
    ) -> Result<Vec<StreamEntry>, BrandError> {
        self.check_connected()?;
        let exclusive_start = start.strip_prefix('(');
        let entries = self.streams.lock().get(stream).cloned().unwrap_or_default();
        let mut matched: Vec<StreamEntry> = entries
            .into_iter()
            .filter(|e| {
                let after_start = match exclusive_start {
                    Some(id) => id_after(&e.id, id),
                    None => start == "0-0" || start == "-" || e.id.as_str() >= start,
                };
                let before_end = end == "+" || e.id.as_str() <= end;
                after_start && before_end
            })
            .collect();
        if let Some(count) = count {
            matched.truncate(count);
        }
        Ok(matched)
    }

    async fn read_reverse(&self, stream: &str, count: usize) -> Result<Vec<StreamEntry>, BrandError> {
        self.check_connected()?;
        let mut entries = self.streams.lock().get(stream).cloned().unwrap_or_default();
        entries.reverse();
        entries.truncate(count);
        Ok(entries)
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), BrandError> {
        self.check_connected()?;
        self.config.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn snapshot(&self) -> Result<(), BrandError> {
        self.check_connected()
    }

    async fn flush(&self) -> Result<(), BrandError> {
        self.check_connected()?;
        self.streams.lock().clear();
        Ok(())
    }
}

/// Whether entry id `id` is strictly newer than the cursor `after`, comparing
/// `<counter>-<seq>` pairs numerically rather than lexicographically (a
/// 10-"0" vs 9-"0" lexical compare would otherwise get the order wrong).
fn id_after(id: &str, after: &str) -> bool {
    parse_id(id) > parse_id(after)
}

fn parse_id(id: &str) -> (u64, u64) {
    let mut parts = id.splitn(2, '-');
    let ms = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let seq = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    (ms, seq)
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
