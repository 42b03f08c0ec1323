// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A line-delimited JSON/TCP `BusClient`.
//!
//! Spec §1 explicitly does not standardize LKD's wire protocol; this is a
//! small request/response-over-a-persistent-socket protocol of this repo's
//! own invention (documented in DESIGN.md), not a reproduction of any real
//! home-automation daemon's wire format.
//!
//! Each line is one JSON object. Requests carry a correlation `id` and are
//! matched to their response through a pending-request table; unsolicited
//! lines (`op: "changed"`) are change notifications pushed by the server
//! and are fanned out to every subscriber.

use crate::client::{BusClient, BusError, ChangeCallback};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use sv_core::{ActionDescriptor, ObjectId, ObjectValue};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex as AsyncMutex};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request<'a> {
    Get { id: u64, object: &'a ObjectId },
    Set { id: u64, object: &'a ObjectId, value: ObjectValue },
    ExecuteAction { id: u64, action: &'a ActionDescriptor },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Incoming {
    Response {
        id: u64,
        ok: bool,
        #[serde(default)]
        value: Option<ObjectValue>,
        #[serde(default)]
        error: Option<String>,
    },
    Changed {
        object: ObjectId,
        value: ObjectValue,
    },
}

struct PendingResponse {
    ok: bool,
    value: Option<ObjectValue>,
    error: Option<String>,
}

struct Inner {
    writer: AsyncMutex<tokio::net::tcp::OwnedWriteHalf>,
    pending: Mutex<HashMap<u64, oneshot::Sender<PendingResponse>>>,
    next_id: AtomicU64,
    subscribers: Mutex<Vec<ChangeCallback>>,
}

#[derive(Clone)]
pub struct TcpBusClient {
    inner: Arc<Inner>,
}

impl TcpBusClient {
    pub async fn connect(addr: impl Into<String>) -> Result<Self, BusError> {
        let addr = addr.into();
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| BusError::Io(format!("connect {addr}: {e}")))?;
        let (read_half, write_half) = stream.into_split();

        let inner = Arc::new(Inner {
            writer: AsyncMutex::new(write_half),
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
        });

        let read_inner = inner.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(read_half).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => read_inner.handle_line(&line),
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "bus connection read error");
                        break;
                    }
                }
            }
        });

        Ok(Self { inner })
    }

    fn next_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn roundtrip(&self, id: u64, request: &Request<'_>) -> Result<PendingResponse, BusError> {
        let (tx, rx) = oneshot::channel();
        self.inner.pending.lock().insert(id, tx);

        let mut line = serde_json::to_string(request).map_err(|e| BusError::Io(e.to_string()))?;
        line.push('\n');
        {
            let mut writer = self.inner.writer.lock().await;
            writer
                .write_all(line.as_bytes())
                .await
                .map_err(|e| BusError::Io(e.to_string()))?;
        }

        rx.await
            .map_err(|_| BusError::Io("connection closed before response".into()))
    }
}

impl Inner {
    fn handle_line(&self, line: &str) {
        let incoming: Incoming = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, %line, "malformed line from bus backend");
                return;
            }
        };
        match incoming {
            Incoming::Response { id, ok, value, error } => {
                if let Some(tx) = self.pending.lock().remove(&id) {
                    let _ = tx.send(PendingResponse { ok, value, error });
                } else {
                    debug!(id, "response for unknown or already-resolved request");
                }
            }
            Incoming::Changed { object, value } => {
                for callback in self.subscribers.lock().iter() {
                    callback(object.clone(), value);
                }
            }
        }
    }
}

#[async_trait]
impl BusClient for TcpBusClient {
    async fn get(&self, object: &ObjectId) -> Result<ObjectValue, BusError> {
        let id = self.next_id();
        let response = self.roundtrip(id, &Request::Get { id, object }).await?;
        if !response.ok {
            return Err(BusError::Io(response.error.unwrap_or_else(|| "get failed".into())));
        }
        response
            .value
            .ok_or_else(|| BusError::Io("response missing value".into()))
    }

    async fn set(&self, object: &ObjectId, value: ObjectValue) -> Result<(), BusError> {
        let id = self.next_id();
        let response = self.roundtrip(id, &Request::Set { id, object, value }).await?;
        if !response.ok {
            return Err(BusError::Io(response.error.unwrap_or_else(|| "set failed".into())));
        }
        Ok(())
    }

    async fn execute_action(&self, action: &ActionDescriptor) -> Result<(), BusError> {
        let id = self.next_id();
        let response = self
            .roundtrip(id, &Request::ExecuteAction { id, action })
            .await?;
        if !response.ok {
            return Err(BusError::Io(
                response.error.unwrap_or_else(|| "execute_action failed".into()),
            ));
        }
        Ok(())
    }

    fn subscribe(&self, callback: ChangeCallback) {
        self.inner.subscribers.lock().push(callback);
    }
}
