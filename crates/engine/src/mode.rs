// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mode controller (spec §4.4): tracks the current mode against the
//! integer code written to `modeObject` and answers which sensors a mode
//! requires enabled. The scoped re-evaluation sequence on a mode change
//! (stop/start sensor activation timers, write `enabled`, emit
//! ModeLeft/ModeEntered) is orchestrated by the engine, since it alone
//! holds the sensor runtimes and the suspended-update scope.

use sv_core::{EngineError, ModeConfig, ModeName, SensorName};

pub struct ModeController {
    modes: Vec<ModeConfig>,
    current: Option<ModeName>,
}

impl ModeController {
    pub fn new(modes: Vec<ModeConfig>) -> Self {
        Self { modes, current: None }
    }

    pub fn current(&self) -> Option<&ModeName> {
        self.current.as_ref()
    }

    pub fn by_code(&self, code: i64) -> Result<&ModeConfig, EngineError> {
        self.modes
            .iter()
            .find(|m| m.code == code)
            .ok_or_else(|| EngineError::Configuration(format!("no mode bound to code {code}")))
    }

    pub fn by_name(&self, name: &ModeName) -> Option<&ModeConfig> {
        self.modes.iter().find(|m| &m.name == name)
    }

    /// Sensors required by the current mode, or an empty slice if no mode
    /// is active yet (before the first `modeObject` read).
    pub fn required_sensors(&self) -> &[SensorName] {
        self.current
            .as_ref()
            .and_then(|name| self.by_name(name))
            .map(|m| m.sensor_names.as_slice())
            .unwrap_or(&[])
    }

    pub fn requires(&self, sensor: &SensorName) -> bool {
        self.current
            .as_ref()
            .and_then(|name| self.by_name(name))
            .is_some_and(|m| m.requires(sensor))
    }

    /// Swap in a new current mode, returning the previous one (`None` on
    /// the very first transition, which emits no ModeLeft).
    pub fn swap(&mut self, new_mode: ModeName) -> Option<ModeName> {
        self.current.replace(new_mode)
    }
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
