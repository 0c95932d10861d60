// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use async_trait::async_trait;
use brand_core::BrandError;
use brand_wire::StreamFields;
use redis::aio::ConnectionManager;
use redis::streams::{StreamReadOptions, StreamReadReply};
use redis::{AsyncCommands, Client};

use crate::client::StoreClient;
use crate::entry::StreamEntry;

/// Wraps a `redis` crate connection behind [`StoreClient`]. Uses
/// `ConnectionManager` so a dropped TCP connection is transparently
/// reconnected for the *next* call — a call already in flight during a drop
/// still surfaces `BrandError::Store`, which the caller treats as fatal.
pub struct RedisStoreClient {
    conn: ConnectionManager,
}

impl RedisStoreClient {
    /// Connects with the given connect timeout. `addr` is a `redis://host:port/`
    /// URL.
    pub async fn connect(addr: &str, connect_timeout: Duration) -> Result<Self, BrandError> {
        let client = Client::open(addr).map_err(store_err)?;
        let conn = tokio::time::timeout(connect_timeout, client.get_connection_manager())
            .await
            .map_err(|_| BrandError::Store {
                message: format!("timed out connecting to {addr}"),
            })?
            .map_err(store_err)?;
        Ok(Self { conn })
    }
}

fn store_err(err: redis::RedisError) -> BrandError {
    BrandError::Store { message: err.to_string() }
}

#[async_trait]
impl StoreClient for RedisStoreClient {
    async fn append(&self, stream: &str, fields: StreamFields) -> Result<String, BrandError> {
        let items: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let mut conn = self.conn.clone();
        conn.xadd(stream, "*", &items).await.map_err(store_err)
    }

    async fn read_tail(
        &self,
        streams: &[(&str, &str)],
        count: Option<usize>,
        block_ms: u64,
    ) -> Result<Vec<(String, Vec<StreamEntry>)>, BrandError> {
        let keys: Vec<&str> = streams.iter().map(|(k, _)| *k).collect();
        let ids: Vec<&str> = streams.iter().map(|(_, id)| *id).collect();

        let mut opts = StreamReadOptions::default().block(block_ms as usize);
        if let Some(count) = count {
            opts = opts.count(count);
        }

        let mut conn = self.conn.clone();
        let reply: StreamReadReply = conn.xread_options(&keys, &ids, &opts).await.map_err(store_err)?;

        Ok(reply
            .keys
            .into_iter()
            .map(|key| {
                let entries = key
                    .ids
                    .into_iter()
                    .map(|id| StreamEntry::new(id.id, decode_pairs(id.map)))
                    .collect();
                (key.key, entries)
            })
            .collect())
    }

    async fn read_range(
        &self,
        stream: &str,
        start: &str,
        end: &str,
        count: Option<usize>,
    ) -> Result<Vec<StreamEntry>, BrandError> {
        let mut conn = self.conn.clone();
        let reply: redis::streams::StreamRangeReply = match count {
            Some(count) => conn.xrange_count(stream, start, end, count).await,
            None => conn.xrange(stream, start, end).await,
        }
        .map_err(store_err)?;

        Ok(reply
            .ids
            .into_iter()
            .map(|id| StreamEntry::new(id.id, decode_pairs(id.map)))
            .collect())
    }

    async fn read_reverse(&self, stream: &str, count: usize) -> Result<Vec<StreamEntry>, BrandError> {
        let mut conn = self.conn.clone();
        let reply: redis::streams::StreamRangeReply =
            conn.xrevrange_count(stream, "+", "-", count).await.map_err(store_err)?;

        Ok(reply
            .ids
            .into_iter()
            .map(|id| StreamEntry::new(id.id, decode_pairs(id.map)))
            .collect())
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), BrandError> {
        let mut conn = self.conn.clone();
        redis::cmd("CONFIG")
            .arg("SET")
            .arg(key)
            .arg(value)
            .query_async::<()>(&mut conn)
            .await
            .map_err(store_err)
    }

    async fn snapshot(&self) -> Result<(), BrandError> {
        let mut conn = self.conn.clone();
        redis::cmd("SAVE").query_async::<()>(&mut conn).await.map_err(store_err)
    }

    async fn flush(&self) -> Result<(), BrandError> {
        let mut conn = self.conn.clone();
        conn.flushdb().await.map_err(store_err)
    }
}

fn decode_pairs(map: std::collections::HashMap<String, redis::Value>) -> StreamFields {
    map.into_iter()
        .filter_map(|(k, v)| match v {
            redis::Value::BulkString(bytes) => {
                Some((k, String::from_utf8_lossy(&bytes).into_owned()))
            }
            redis::Value::SimpleString(s) => Some((k, s)),
            _ => None,
        })
        .collect()
}
