// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alert configuration and status (spec §3 "Alert", §4.3).

use crate::event::EventBinding;
use crate::name::{AlertName, ObjectId};
use serde::{Deserialize, Serialize};

/// The alert state machine's status (spec §4.3 transition table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Stopped,
    Initializing,
    Active,
    Paused,
}

crate::simple_display! {
    AlertStatus {
        Stopped => "stopped",
        Initializing => "initializing",
        Active => "active",
        Paused => "paused",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    pub name: AlertName,
    pub persistence_object: Option<ObjectId>,
    pub inhibition_object: Option<ObjectId>,
    #[serde(default)]
    pub event_bindings: Vec<EventBinding>,
}

crate::builder! {
    pub struct AlertConfigBuilder => AlertConfig {
        into { name: AlertName = "alert" }
        option {
            persistence_object: ObjectId = None,
            inhibition_object: ObjectId = None
        }
        computed { event_bindings: Vec<EventBinding> = Vec::new() }
    }
}

#[cfg(test)]
#[path = "alert_tests.rs"]
mod tests;
