// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sensor runtime (spec §4.2), grounded on
//! `original_source/homewatcher/sensor.py`: trigger recomputation (boolean
//! and float-with-hysteresis), enablement bookkeeping, and the activation
//! pipeline's pure decision logic. Timer wiring itself lives in the engine,
//! which is the only place with enough context (other sensors' trigger
//! state, the current mode) to bind a timer's callbacks.

use parking_lot::Mutex;
use sv_core::{ObjectValue, SensorConfig, SensorKind};

/// What a watched-object update did to a sensor's trigger state, from the
/// alert-membership point of view: only a transition matters, a
/// same-state update is a no-op for the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEdge {
    Rising,
    Falling,
    Unchanged,
}

struct SensorState {
    triggered: bool,
    enabled: bool,
}

pub struct SensorRuntime {
    pub config: SensorConfig,
    state: Mutex<SensorState>,
}

impl SensorRuntime {
    pub fn new(config: SensorConfig) -> Self {
        Self {
            config,
            state: Mutex::new(SensorState { triggered: false, enabled: false }),
        }
    }

    /// Last-computed trigger state. A disabled sensor simply stops
    /// receiving watched-object notifications (spec §9 open question 2),
    /// so this freezes rather than resetting on disable.
    pub fn is_triggered(&self) -> bool {
        self.state.lock().triggered
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    /// Recompute trigger state for a new `watched` value (spec §4.2),
    /// reporting which edge (if any) the caller should act on: a rising
    /// edge asks the alert to admit this sensor, a falling edge while
    /// already a member asks it to leave.
    pub fn notify_watched_changed(&self, value: ObjectValue) -> TriggerEdge {
        let mut state = self.state.lock();
        let was_triggered = state.triggered;
        let now_triggered = match &self.config.kind {
            SensorKind::Boolean { trigger_value } => {
                let v = value.as_bool().unwrap_or(false);
                v == *trigger_value
            }
            SensorKind::Float { lower, upper, hysteresis } => {
                let v = value.as_float().unwrap_or(0.0);
                float_trigger_state(was_triggered, v, *lower, *upper, *hysteresis)
            }
        };
        state.triggered = now_triggered;
        match (was_triggered, now_triggered) {
            (false, true) => TriggerEdge::Rising,
            (true, false) => TriggerEdge::Falling,
            _ => TriggerEdge::Unchanged,
        }
    }

    /// Set the authoritative enablement flag (mirrors `enabledObject`,
    /// spec §3 invariant 7). Returns whether this is a flip (vs a
    /// redundant write of the same value), since side effects only fire on
    /// a real transition.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        let mut state = self.state.lock();
        let changed = state.enabled != enabled;
        state.enabled = enabled;
        changed
    }
}

/// Float sensor trigger recomputation with Schmitt-trigger hysteresis
/// (spec §4.2, §8 property): while not triggered, trip on reaching either
/// bound; once triggered, release only strictly inside `(lower+h, upper-h)`.
fn float_trigger_state(
    currently_triggered: bool,
    value: f64,
    lower: Option<f64>,
    upper: Option<f64>,
    hysteresis: f64,
) -> bool {
    if !currently_triggered {
        lower.is_some_and(|l| value <= l) || upper.is_some_and(|u| value >= u)
    } else {
        let released = lower.is_none_or(|l| value > l + hysteresis)
            && upper.is_none_or(|u| value < u - hysteresis);
        !released
    }
}

#[cfg(test)]
#[path = "sensor_tests.rs"]
mod tests;
