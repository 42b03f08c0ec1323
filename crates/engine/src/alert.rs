// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-alert state machine (spec §4.3), grounded on
//! `original_source/homewatcher/alarm.py`'s `Alert.updateStatus()`: events
//! are not emitted inline as membership changes happen, they are derived by
//! diffing `sensorsInAlert` against the snapshot taken at the end of the
//! previous `updateStatus()` call. This is what lets the "alert-updates-
//! suspended" batching scope (spec §4.3 "Batched updates") collapse several
//! membership mutations into one net set of events for free: the diff is
//! always against whatever the set looked like the last time status was
//! recomputed, however many mutations happened in between.

use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::HashSet;
use std::time::Duration;
use sv_core::{AlertConfig, AlertName, AlertStatus, Effect, EventContext, EventKind, SensorName, TimerOwner};
use tracing::info;

struct AlertState {
    status: AlertStatus,
    sensors_in_prealert: HashSet<SensorName>,
    sensors_in_alert: HashSet<SensorName>,
    /// `sensorsInAlert` as of the end of the previous `update_status` call.
    sensors_in_alert_snapshot: HashSet<SensorName>,
}

impl AlertState {
    fn new() -> Self {
        Self {
            status: AlertStatus::Stopped,
            sensors_in_prealert: HashSet::new(),
            sensors_in_alert: HashSet::new(),
            sensors_in_alert_snapshot: HashSet::new(),
        }
    }
}

/// The net result of a status recomputation: which sensors joined/left
/// `sensorsInAlert` since the last recomputation, and the old/new status.
/// The engine uses this to layer per-sensor persistence-object writes onto
/// `ALERT_ACTIVATED`/`ALERT_STOPPED` without `AlertRuntime` needing to know
/// about sensor configuration.
#[derive(Debug, Clone)]
pub struct AlertTransition {
    pub old_status: AlertStatus,
    pub new_status: AlertStatus,
    pub sensors_joined: Vec<SensorName>,
    pub sensors_left: Vec<SensorName>,
}

pub struct AlertRuntime {
    pub config: AlertConfig,
    inner: ReentrantMutex<RefCell<AlertState>>,
}

fn emit(event: EventKind, ctx: &EventContext) -> Effect {
    Effect::Emit { event, context: ctx.clone() }
}

impl AlertRuntime {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            inner: ReentrantMutex::new(RefCell::new(AlertState::new())),
        }
    }

    pub fn name(&self) -> &AlertName {
        &self.config.name
    }

    pub fn status(&self) -> AlertStatus {
        self.inner.lock().borrow().status
    }

    pub fn sensors_in_prealert(&self) -> Vec<SensorName> {
        self.inner.lock().borrow().sensors_in_prealert.iter().cloned().collect()
    }

    pub fn sensors_in_alert(&self) -> Vec<SensorName> {
        self.inner.lock().borrow().sensors_in_alert.iter().cloned().collect()
    }

    pub fn is_member(&self, sensor: &SensorName) -> bool {
        let guard = self.inner.lock();
        let state = guard.borrow();
        state.sensors_in_prealert.contains(sensor) || state.sensors_in_alert.contains(sensor)
    }

    /// `addSensorToAlert` (spec §4.3). `inhibited` and `persistence_true`
    /// are read from LKD by the engine before the call, per §5's "bus reads
    /// are not locked by the engine". Pass `suspend` to defer status
    /// recomputation (alert-updates-suspended scope). `alert_duration_for`
    /// resolves any sensor's per-mode alert duration; `recompute_locked`
    /// needs it for sensors other than `sensor` when an ACTIVE-entry drain
    /// starts their alert timers too.
    pub fn add_sensor(
        &self,
        sensor: &SensorName,
        prealert_duration: Duration,
        inhibited: bool,
        persistence_true: bool,
        suspended: bool,
        alert_duration_for: &dyn Fn(&SensorName) -> Duration,
    ) -> (Vec<Effect>, Option<AlertTransition>) {
        let guard = self.inner.lock();
        let mut state = guard.borrow_mut();
        let mut effects = Vec::new();

        if state.sensors_in_alert.contains(sensor) {
            effects.push(Effect::SetTimer {
                owner: TimerOwner::Alert(sensor.clone()),
                duration: alert_duration_for(sensor),
            });
            return (effects, None);
        }

        if inhibited {
            info!(alert = %self.config.name, %sensor, "sensor join suppressed by inhibition");
            return (effects, None);
        }

        match state.status {
            AlertStatus::Stopped | AlertStatus::Initializing if prealert_duration.is_zero() => {
                // A zero prealert duration must never be observable as its
                // own state (spec §8): join straight into ALERT so the
                // transition out of STOPPED/INITIALIZING lands on ACTIVE in
                // one recomputation.
                state.sensors_in_alert.insert(sensor.clone());
                effects.push(Effect::SetTimer {
                    owner: TimerOwner::Alert(sensor.clone()),
                    duration: alert_duration_for(sensor),
                });
            }
            AlertStatus::Stopped | AlertStatus::Initializing => {
                state.sensors_in_prealert.insert(sensor.clone());
                effects.push(Effect::SetTimer {
                    owner: TimerOwner::Prealert(sensor.clone()),
                    duration: prealert_duration,
                });
            }
            AlertStatus::Paused | AlertStatus::Active => {
                state.sensors_in_alert.insert(sensor.clone());
                effects.push(Effect::SetTimer {
                    owner: TimerOwner::Alert(sensor.clone()),
                    duration: alert_duration_for(sensor),
                });
            }
        }

        if suspended {
            (effects, None)
        } else {
            let (mut transition_effects, transition) =
                self.recompute_locked(&mut state, persistence_true, alert_duration_for);
            effects.append(&mut transition_effects);
            (effects, Some(transition))
        }
    }

    /// `notifySensorPrealertExpired` (spec §4.3).
    pub fn notify_prealert_expired(
        &self,
        sensor: &SensorName,
        persistence_true: bool,
        suspended: bool,
        alert_duration_for: &dyn Fn(&SensorName) -> Duration,
    ) -> (Vec<Effect>, Option<AlertTransition>) {
        let guard = self.inner.lock();
        let mut state = guard.borrow_mut();
        let mut effects = Vec::new();

        if !state.sensors_in_prealert.remove(sensor) {
            return (effects, None);
        }
        state.sensors_in_alert.insert(sensor.clone());
        effects.push(Effect::SetTimer {
            owner: TimerOwner::Alert(sensor.clone()),
            duration: alert_duration_for(sensor),
        });

        if suspended {
            (effects, None)
        } else {
            let (mut transition_effects, transition) =
                self.recompute_locked(&mut state, persistence_true, alert_duration_for);
            effects.append(&mut transition_effects);
            (effects, Some(transition))
        }
    }

    /// `removeSensorFromAlert` (spec §4.3): timer expiry or external
    /// disablement.
    pub fn remove_sensor(
        &self,
        sensor: &SensorName,
        persistence_true: bool,
        suspended: bool,
        alert_duration_for: &dyn Fn(&SensorName) -> Duration,
    ) -> (Vec<Effect>, Option<AlertTransition>) {
        let guard = self.inner.lock();
        let mut state = guard.borrow_mut();
        let mut effects = Vec::new();

        let was_prealert = state.sensors_in_prealert.remove(sensor);
        let was_alert = state.sensors_in_alert.remove(sensor);
        if !was_prealert && !was_alert {
            return (effects, None);
        }
        if was_prealert {
            effects.push(Effect::CancelTimer { owner: TimerOwner::Prealert(sensor.clone()) });
        }
        if was_alert {
            effects.push(Effect::CancelTimer { owner: TimerOwner::Alert(sensor.clone()) });
        }

        if suspended {
            (effects, None)
        } else {
            let (mut transition_effects, transition) =
                self.recompute_locked(&mut state, persistence_true, alert_duration_for);
            effects.append(&mut transition_effects);
            (effects, Some(transition))
        }
    }

    /// `stop()`: unconditional transition to STOPPED, draining both
    /// membership sets, regardless of persistence configuration.
    pub fn stop(&self) -> (Vec<Effect>, AlertTransition) {
        let guard = self.inner.lock();
        let mut state = guard.borrow_mut();
        let mut effects = Vec::new();

        for sensor in state.sensors_in_prealert.drain() {
            effects.push(Effect::CancelTimer { owner: TimerOwner::Prealert(sensor) });
        }
        for sensor in state.sensors_in_alert.drain() {
            effects.push(Effect::CancelTimer { owner: TimerOwner::Alert(sensor) });
        }

        let old_status = state.status;
        state.status = AlertStatus::Stopped;
        let sensors_left: Vec<SensorName> = state.sensors_in_alert_snapshot.iter().cloned().collect();
        state.sensors_in_alert_snapshot.clear();

        let ctx = EventContext::for_alert(self.config.name.clone());
        match old_status {
            AlertStatus::Initializing => {
                effects.push(emit(EventKind::AlertAborted, &ctx));
            }
            AlertStatus::Active => {
                for sensor in &sensors_left {
                    effects.push(emit(EventKind::SensorLeft, &EventContext { sensors_in_alert: vec![sensor.clone()], ..ctx.clone() }));
                }
                effects.push(emit(EventKind::AlertDeactivated, &ctx));
                effects.push(emit(EventKind::AlertReset, &ctx));
            }
            AlertStatus::Paused => {
                effects.push(emit(EventKind::AlertReset, &ctx));
            }
            AlertStatus::Stopped => {}
        }
        if old_status != AlertStatus::Stopped {
            effects.push(emit(EventKind::AlertStopped, &ctx));
        }

        let transition = AlertTransition {
            old_status,
            new_status: AlertStatus::Stopped,
            sensors_joined: Vec::new(),
            sensors_left,
        };
        (effects, transition)
    }

    /// `updateStatus()`: recompute status from the current membership sets
    /// and the previous status, diff `sensorsInAlert` against the last
    /// snapshot to derive `SENSOR_JOINED`/`SENSOR_LEFT`, and emit the
    /// transition-specific events from spec §4.3's table in order.
    /// `alert_duration_for` resolves the per-mode alert duration of any
    /// sensor drained from prealert straight into alert below, since a
    /// drained sensor never went through `add_sensor`'s own alert-timer
    /// branch (`original_source/homewatcher/alarm.py:570-588`: the drain
    /// stops every obsolete prealert timer and starts a fresh alert timer
    /// for each newly-ALERT sensor).
    fn recompute_locked(
        &self,
        state: &mut AlertState,
        persistence_true: bool,
        alert_duration_for: &dyn Fn(&SensorName) -> Duration,
    ) -> (Vec<Effect>, AlertTransition) {
        let old_status = state.status;
        let has_prealert = !state.sensors_in_prealert.is_empty();
        let has_alert = !state.sensors_in_alert.is_empty();
        let mut timer_effects = Vec::new();

        let new_status = if has_alert {
            // Entry into ACTIVE short-circuits any remaining prealert
            // members straight into sensorsInAlert (spec §4.3): cancel each
            // one's prealert timer and start its alert timer, exactly as if
            // it had expired its own prealert on the spot.
            if !state.sensors_in_prealert.is_empty() {
                for sensor in state.sensors_in_prealert.drain().collect::<Vec<_>>() {
                    timer_effects.push(Effect::CancelTimer { owner: TimerOwner::Prealert(sensor.clone()) });
                    timer_effects.push(Effect::SetTimer {
                        owner: TimerOwner::Alert(sensor.clone()),
                        duration: alert_duration_for(&sensor),
                    });
                    state.sensors_in_alert.insert(sensor);
                }
            }
            AlertStatus::Active
        } else if has_prealert {
            AlertStatus::Initializing
        } else {
            match old_status {
                AlertStatus::Active | AlertStatus::Paused if persistence_true => AlertStatus::Paused,
                _ => AlertStatus::Stopped,
            }
        };

        let joined: Vec<SensorName> = state
            .sensors_in_alert
            .difference(&state.sensors_in_alert_snapshot)
            .cloned()
            .collect();
        let left: Vec<SensorName> = state
            .sensors_in_alert_snapshot
            .difference(&state.sensors_in_alert)
            .cloned()
            .collect();

        let mut effects = timer_effects;
        let ctx = EventContext::for_alert(self.config.name.clone());

        match (old_status, new_status) {
            (AlertStatus::Stopped, AlertStatus::Initializing) => {
                effects.push(emit(EventKind::PrealertStarted, &ctx));
            }
            (AlertStatus::Initializing, AlertStatus::Active)
            | (AlertStatus::Stopped, AlertStatus::Active) => {
                // The latter arises from a suspended batch that drains
                // prealert straight into alert between recomputations (spec
                // §4.3 "Batched updates", scenario S3's shunt), or from a
                // zero-prealert-duration sensor joining directly.
                for sensor in &joined {
                    effects.push(sensor_joined_event(&ctx, sensor));
                }
                effects.push(emit(EventKind::AlertActivated, &ctx));
            }
            (AlertStatus::Active, AlertStatus::Active) => {
                for sensor in &joined {
                    effects.push(sensor_joined_event(&ctx, sensor));
                }
                for sensor in &left {
                    effects.push(sensor_left_event(&ctx, sensor));
                }
            }
            (AlertStatus::Active, AlertStatus::Paused) => {
                for sensor in &left {
                    effects.push(sensor_left_event(&ctx, sensor));
                }
                effects.push(emit(EventKind::AlertDeactivated, &ctx));
                effects.push(emit(EventKind::AlertPaused, &ctx));
            }
            (AlertStatus::Active, AlertStatus::Stopped) => {
                for sensor in &left {
                    effects.push(sensor_left_event(&ctx, sensor));
                }
                effects.push(emit(EventKind::AlertDeactivated, &ctx));
                effects.push(emit(EventKind::AlertReset, &ctx));
                effects.push(emit(EventKind::AlertStopped, &ctx));
            }
            (AlertStatus::Paused, AlertStatus::Active) => {
                effects.push(emit(EventKind::AlertResumed, &ctx));
                for sensor in &joined {
                    effects.push(sensor_joined_event(&ctx, sensor));
                }
                effects.push(emit(EventKind::AlertActivated, &ctx));
            }
            (AlertStatus::Paused, AlertStatus::Stopped) => {
                effects.push(emit(EventKind::AlertReset, &ctx));
                effects.push(emit(EventKind::AlertStopped, &ctx));
            }
            (AlertStatus::Initializing, AlertStatus::Stopped) => {
                effects.push(emit(EventKind::AlertAborted, &ctx));
                effects.push(emit(EventKind::AlertStopped, &ctx));
            }
            _ => {}
        }

        state.status = new_status;
        state.sensors_in_alert_snapshot = state.sensors_in_alert.clone();

        let transition = AlertTransition {
            old_status,
            new_status,
            sensors_joined: joined,
            sensors_left: left,
        };
        (effects, transition)
    }

    /// Flush a deferred recomputation on exit from the "alert-updates-
    /// suspended" scope (spec §4.3 "Batched updates"). Returns `None` if
    /// nothing changed since the last recomputation.
    pub fn flush_suspended(
        &self,
        persistence_true: bool,
        alert_duration_for: &dyn Fn(&SensorName) -> Duration,
    ) -> (Vec<Effect>, Option<AlertTransition>) {
        let guard = self.inner.lock();
        let mut state = guard.borrow_mut();
        let (effects, transition) = self.recompute_locked(&mut state, persistence_true, alert_duration_for);
        if transition.old_status == transition.new_status
            && transition.sensors_joined.is_empty()
            && transition.sensors_left.is_empty()
        {
            (Vec::new(), None)
        } else {
            (effects, Some(transition))
        }
    }
}

fn sensor_joined_event(ctx: &EventContext, sensor: &SensorName) -> Effect {
    emit(EventKind::SensorJoined, &EventContext { sensors_in_alert: vec![sensor.clone()], ..ctx.clone() })
}

fn sensor_left_event(ctx: &EventContext, sensor: &SensorName) -> Effect {
    emit(EventKind::SensorLeft, &EventContext { sensors_in_alert: vec![sensor.clone()], ..ctx.clone() })
}

#[cfg(test)]
#[path = "alert_tests.rs"]
mod tests;
