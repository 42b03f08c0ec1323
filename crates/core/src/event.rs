// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types fired by the alert state machine and mode controller (spec
//! §4.3 "Emitted events", §4.4), and the context an event carries so the
//! context-handler registry (spec §4.5) can expand templated text.

use crate::action::ActionDescriptor;
use crate::name::{AlertName, ModeName, SensorName};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PrealertStarted,
    SensorJoined,
    SensorLeft,
    AlertActivated,
    AlertDeactivated,
    AlertPaused,
    AlertResumed,
    AlertReset,
    AlertStopped,
    AlertAborted,
    ModeEntered,
    ModeLeft,
}

/// A configured `(event, actions)` pair, attached either to a single entity
/// (an alert or a mode) or to the repository-wide binding list that is
/// concatenated onto every entity's own bindings (spec §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBinding {
    pub event: EventKind,
    pub actions: Vec<ActionDescriptor>,
}

/// Structured context supplied to the context-handler registry when an event
/// fires, carrying exactly the data spec §4.5's named handlers need:
/// `alert.name`, `alert.sensors-status`, `mode.current`, `mode.enabled-sensors`.
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    pub alert: Option<AlertName>,
    pub mode: Option<ModeName>,
    pub sensors_in_prealert: Vec<SensorName>,
    pub sensors_in_alert: Vec<SensorName>,
    pub sensors_in_pause: Vec<SensorName>,
    pub enabled_sensors: Vec<SensorName>,
    pub pending_activation_sensors: Vec<SensorName>,
}

impl EventContext {
    pub fn for_alert(alert: AlertName) -> Self {
        Self {
            alert: Some(alert),
            ..Default::default()
        }
    }

    pub fn for_mode(mode: ModeName) -> Self {
        Self {
            mode: Some(mode),
            ..Default::default()
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
