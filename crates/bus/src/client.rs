// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The bus backend client interface (spec §6): typed get/set of a named LKD
//! object plus change subscription, and action execution.

use async_trait::async_trait;
use std::sync::Arc;
use sv_core::{ActionDescriptor, ObjectId, ObjectValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("object {0} not found")]
    NotFound(ObjectId),
    #[error("bus I/O error: {0}")]
    Io(String),
}

/// Invoked with `(objectId, newValue)` when LKD reports a value change
/// (spec §6 "Callback endpoint"). Multiple subscribers may be registered;
/// all are called on every change.
pub type ChangeCallback = Arc<dyn Fn(ObjectId, ObjectValue) + Send + Sync>;

#[async_trait]
pub trait BusClient: Send + Sync {
    async fn get(&self, object: &ObjectId) -> Result<ObjectValue, BusError>;

    async fn set(&self, object: &ObjectId, value: ObjectValue) -> Result<(), BusError>;

    /// Execute an action document (spec §6: `executeAction`). The core
    /// constructs `send-email`/`send-sms`/`shell-cmd` documents itself;
    /// this call is opaque from the client's point of view.
    async fn execute_action(&self, action: &ActionDescriptor) -> Result<(), BusError>;

    /// Register a callback invoked on every object value change this
    /// client is told about. The engine is responsible for filtering to
    /// the objects it cares about.
    fn subscribe(&self, callback: ChangeCallback);
}
