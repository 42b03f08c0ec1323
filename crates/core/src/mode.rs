// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mode configuration (spec §3 "Mode", §4.4).

use crate::event::EventBinding;
use crate::name::{ModeName, SensorName};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeConfig {
    pub name: ModeName,
    /// The integer value written to the mode bus object for this mode.
    pub code: i64,
    #[serde(default)]
    pub sensor_names: Vec<SensorName>,
    #[serde(default)]
    pub event_bindings: Vec<EventBinding>,
}

impl ModeConfig {
    pub fn requires(&self, sensor: &SensorName) -> bool {
        self.sensor_names.contains(sensor)
    }
}

crate::builder! {
    pub struct ModeConfigBuilder => ModeConfig {
        into { name: ModeName = "mode" }
        set { code: i64 = 0 }
        computed {
            sensor_names: Vec<SensorName> = Vec::new(),
            event_bindings: Vec<EventBinding> = Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
