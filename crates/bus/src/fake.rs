// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `BusClient` for deterministic engine tests: state lives in a
//! `HashMap` guarded by `parking_lot::Mutex`, and `set_external` simulates a
//! field-device-driven value change the way LKD would push one, so scenario
//! tests can write `watched(K)=true` the way spec §8's S1–S6 describe it.

use crate::client::{BusClient, BusError, ChangeCallback};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use sv_core::{ActionDescriptor, ObjectId, ObjectValue};

#[derive(Default)]
struct State {
    values: HashMap<ObjectId, ObjectValue>,
    subscribers: Vec<ChangeCallback>,
    executed_actions: Vec<ActionDescriptor>,
}

#[derive(Clone, Default)]
pub struct FakeBusClient {
    state: Arc<Mutex<State>>,
}

impl FakeBusClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object's initial value without triggering a notification.
    pub fn seed(&self, object: impl Into<ObjectId>, value: impl Into<ObjectValue>) {
        self.state.lock().values.insert(object.into(), value.into());
    }

    /// Simulate LKD pushing a value change: stores the value and notifies
    /// every subscriber, mirroring how a real field-device edge would
    /// arrive through the callback endpoint (spec §6).
    pub fn set_external(&self, object: impl Into<ObjectId>, value: impl Into<ObjectValue>) {
        let object = object.into();
        let value = value.into();
        let callbacks = {
            let mut state = self.state.lock();
            state.values.insert(object.clone(), value);
            state.subscribers.clone()
        };
        for callback in callbacks {
            callback(object.clone(), value);
        }
    }

    pub fn executed_actions(&self) -> Vec<ActionDescriptor> {
        self.state.lock().executed_actions.clone()
    }
}

#[async_trait]
impl BusClient for FakeBusClient {
    async fn get(&self, object: &ObjectId) -> Result<ObjectValue, BusError> {
        self.state
            .lock()
            .values
            .get(object)
            .copied()
            .ok_or_else(|| BusError::NotFound(object.clone()))
    }

    async fn set(&self, object: &ObjectId, value: ObjectValue) -> Result<(), BusError> {
        self.state.lock().values.insert(object.clone(), value);
        Ok(())
    }

    async fn execute_action(&self, action: &ActionDescriptor) -> Result<(), BusError> {
        self.state.lock().executed_actions.push(action.clone());
        Ok(())
    }

    fn subscribe(&self, callback: ChangeCallback) {
        self.state.lock().subscribers.push(callback);
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
