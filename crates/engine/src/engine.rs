// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level engine (spec §4, component 1): owns every alert, sensor
//! and the mode controller, routes inbound bus callbacks to them, and runs
//! the effect executor. Mirrors the teacher's single coarse lock around
//! state mutation plus an outside-the-lock effect executor
//! (`oddjobs::engine::Scheduler`), generalised from job scheduling to this
//! domain's timers/bus-writes/actions/events.

use crate::event_manager;
use crate::mode::ModeController;
use crate::sensor::{SensorRuntime, TriggerEdge};
use crate::timer::Timer;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};
use sv_bus::BusClient;
use sv_core::{
    AlertName, Effect, EngineError, EventContext, EventKind, ObjectId, ObjectValue, ResolvedConfig,
    SensorName, TimerOwner,
};
use tracing::{error, info, warn};

use crate::alert::AlertRuntime;

/// `ModeDependentValue::duration_for_mode` wants a `&ModeName`; before the
/// first mode switch there isn't one yet, so fall through to the MDV's
/// default by looking up a name that can never be configured.
fn mdv_duration(mdv: &sv_core::ModeDependentValue, mode: Option<&sv_core::ModeName>) -> std::time::Duration {
    match mode {
        Some(m) => mdv.duration_for_mode(m),
        None => mdv.duration_for_mode(&sv_core::ModeName::from("")),
    }
}

enum BoundObject {
    SensorWatched(SensorName),
    SensorEnabled(SensorName),
    SensorPersistence(SensorName),
    AlertPersistence(AlertName),
    AlertInhibition(AlertName),
}

struct Shared {
    bus: Arc<dyn BusClient>,
    sensors: HashMap<SensorName, SensorRuntime>,
    alerts: HashMap<AlertName, AlertRuntime>,
    mode: Mutex<ModeController>,
    mode_object: ObjectId,
    repository_alert_bindings: Vec<sv_core::EventBinding>,
    repository_mode_bindings: Vec<sv_core::EventBinding>,
    objects: HashMap<ObjectId, BoundObject>,
    timers: Mutex<HashMap<TimerOwner, Timer>>,
    alert_persistence: Mutex<HashMap<AlertName, bool>>,
    alert_inhibited: Mutex<HashMap<AlertName, bool>>,
    suspend_depth: AtomicU32,
    pending_flush: Mutex<HashSet<AlertName>>,
    self_ref: Mutex<Weak<Engine>>,
}

/// The running engine. Always held as `Arc<Engine>` so timer callbacks can
/// schedule async follow-up work on themselves.
pub struct Engine {
    shared: Shared,
}

/// RAII guard for spec §4.3/§9's "alert updates suspended" scope: while
/// held, alert recomputation is deferred; dropping it (or calling
/// [`Engine::end_suspend`] explicitly) flushes every alert touched during
/// the scope exactly once.
pub struct SuspendGuard {
    engine: Arc<Engine>,
    armed: bool,
}

impl SuspendGuard {
    /// End the scope and await the flush inline, rather than leaving it to
    /// a detached task spawned from `Drop`. Callers that can await should
    /// always prefer this; `Drop` remains a safety net for those that
    /// can't (e.g. an early return dropping the guard).
    pub async fn finish(mut self) {
        self.armed = false;
        self.engine.clone().end_suspend().await;
    }
}

impl Drop for SuspendGuard {
    fn drop(&mut self) {
        if self.armed {
            let engine = self.engine.clone();
            tokio::spawn(async move { engine.end_suspend().await });
        }
    }
}

impl Engine {
    pub fn new(config: ResolvedConfig, bus: Arc<dyn BusClient>) -> Result<Arc<Self>, EngineError> {
        let mut sensors = HashMap::new();
        let mut alerts = HashMap::new();
        let mut objects = HashMap::new();

        for alert_config in config.alerts.alerts {
            let name = alert_config.name.clone();
            if let Some(obj) = &alert_config.persistence_object {
                objects.insert(obj.clone(), BoundObject::AlertPersistence(name.clone()));
            }
            if let Some(obj) = &alert_config.inhibition_object {
                objects.insert(obj.clone(), BoundObject::AlertInhibition(name.clone()));
            }
            alerts.insert(name, AlertRuntime::new(alert_config));
        }

        for sensor_config in config.sensors {
            let name = sensor_config.name.clone();
            if !alerts.contains_key(&sensor_config.alert) {
                return Err(EngineError::Configuration(format!(
                    "sensor `{name}` references unknown alert `{}`",
                    sensor_config.alert
                )));
            }
            objects.insert(sensor_config.watched_object.clone(), BoundObject::SensorWatched(name.clone()));
            objects.insert(sensor_config.enabled_object.clone(), BoundObject::SensorEnabled(name.clone()));
            if let Some(obj) = &sensor_config.persistence_object {
                objects.insert(obj.clone(), BoundObject::SensorPersistence(name.clone()));
            }
            sensors.insert(name, SensorRuntime::new(sensor_config));
        }

        let engine = Arc::new(Engine {
            shared: Shared {
                bus,
                sensors,
                alerts,
                mode: Mutex::new(ModeController::new(config.modes.modes)),
                mode_object: config.modes.mode_object,
                repository_alert_bindings: config.alerts.repository_bindings,
                repository_mode_bindings: config.modes.repository_bindings,
                objects,
                timers: Mutex::new(HashMap::new()),
                alert_persistence: Mutex::new(HashMap::new()),
                alert_inhibited: Mutex::new(HashMap::new()),
                suspend_depth: AtomicU32::new(0),
                pending_flush: Mutex::new(HashSet::new()),
                self_ref: Mutex::new(Weak::new()),
            },
        });
        *engine.shared.self_ref.lock() = Arc::downgrade(&engine);
        Ok(engine)
    }

    // Every caller reaches this through a method on an already-live
    // `Arc<Engine>` (or a callback closure cloned from one), so the weak
    // reference it upgrades can never be dangling.
    #[allow(clippy::expect_used)]
    fn arc(&self) -> Arc<Engine> {
        self.shared
            .self_ref
            .lock()
            .upgrade()
            .expect("engine outlives its own weak back-reference")
    }

    fn is_suspended(&self) -> bool {
        self.shared.suspend_depth.load(Ordering::SeqCst) > 0
    }

    /// Enter the batched-update scope (spec §9 "alert updates suspended").
    /// Nested calls are supported; only the outermost drop flushes.
    pub fn begin_suspend(self: &Arc<Self>) -> SuspendGuard {
        self.shared.suspend_depth.fetch_add(1, Ordering::SeqCst);
        SuspendGuard { engine: self.clone(), armed: true }
    }

    async fn end_suspend(self: Arc<Self>) {
        if self.shared.suspend_depth.fetch_sub(1, Ordering::SeqCst) != 1 {
            return;
        }
        let pending: Vec<AlertName> = self.shared.pending_flush.lock().drain().collect();
        let current_mode = self.shared.mode.lock().current().cloned();
        let alert_duration_for = |name: &SensorName| -> std::time::Duration {
            self.shared
                .sensors
                .get(name)
                .map(|s| mdv_duration(&s.config.alert_duration, current_mode.as_ref()))
                .unwrap_or_default()
        };
        for alert_name in pending {
            let Some(alert) = self.shared.alerts.get(&alert_name) else { continue };
            let persistence_true = self.alert_persistence_true(&alert_name);
            let (effects, transition) = alert.flush_suspended(persistence_true, &alert_duration_for);
            if let Some(transition) = &transition {
                self.write_member_persistence(&alert_name, transition);
            }
            self.run_effects(effects).await;
        }
    }

    fn alert_persistence_true(&self, alert: &AlertName) -> bool {
        *self.shared.alert_persistence.lock().get(alert).unwrap_or(&false)
    }

    fn alert_inhibited(&self, alert: &AlertName) -> bool {
        *self.shared.alert_inhibited.lock().get(alert).unwrap_or(&false)
    }

    /// Entry point for every `(objectId, value)` change notification LKD
    /// reports (spec §6 callback endpoint).
    pub async fn on_object_changed(self: &Arc<Self>, object: ObjectId, value: ObjectValue) {
        if object == self.shared.mode_object {
            self.on_mode_object_changed(value).await;
            return;
        }
        let Some(binding) = self.shared.objects.get(&object) else {
            return;
        };
        match binding {
            BoundObject::SensorWatched(sensor) => self.on_watched_changed(sensor.clone(), value).await,
            BoundObject::SensorEnabled(sensor) => self.on_enabled_object_changed(sensor.clone(), value).await,
            BoundObject::SensorPersistence(_) => {
                // LKD-authoritative; the engine only ever writes this, it
                // never needs to react to external edits of its own echo.
            }
            BoundObject::AlertPersistence(alert) => self.on_alert_persistence_changed(alert.clone(), value).await,
            BoundObject::AlertInhibition(alert) => self.on_alert_inhibition_changed(alert.clone(), value).await,
        }
    }

    async fn on_watched_changed(self: &Arc<Self>, sensor_name: SensorName, value: ObjectValue) {
        let Some(sensor) = self.shared.sensors.get(&sensor_name) else { return };
        if !sensor.is_enabled() {
            return; // disabled sensors do not receive watched-object notifications
        }
        let edge = sensor.notify_watched_changed(value);
        // Releasing a trigger does not by itself end an alert (spec §4.2,
        // `original_source/homewatcher/sensor.py`'s `notifyWatchedObjectChanged`):
        // membership is only ever dropped by the alert timer expiring or the
        // sensor being disabled. Only a rising edge does anything here.
        if edge != TriggerEdge::Rising {
            return;
        }

        let alert_name = sensor.config.alert.clone();
        let Some(alert) = self.shared.alerts.get(&alert_name) else { return };
        let mode = self.shared.mode.lock();
        let current_mode = mode.current().cloned();
        drop(mode);
        let prealert = mdv_duration(&sensor.config.prealert_duration, current_mode.as_ref());
        let persistence_true = self.alert_persistence_true(&alert_name);
        let suspended = self.is_suspended();
        let inhibited = self.alert_inhibited(&alert_name);
        let alert_duration_for = |name: &SensorName| -> std::time::Duration {
            self.shared
                .sensors
                .get(name)
                .map(|s| mdv_duration(&s.config.alert_duration, current_mode.as_ref()))
                .unwrap_or_default()
        };

        let (effects, transition) =
            alert.add_sensor(&sensor_name, prealert, inhibited, persistence_true, suspended, &alert_duration_for);

        if suspended {
            self.shared.pending_flush.lock().insert(alert_name);
        } else if let Some(transition) = &transition {
            self.write_member_persistence(&alert_name, transition);
        }
        self.run_effects(effects).await;
    }

    fn write_member_persistence(&self, alert_name: &AlertName, transition: &crate::alert::AlertTransition) {
        use sv_core::AlertStatus;
        if transition.new_status == AlertStatus::Active && transition.old_status != AlertStatus::Active {
            self.set_persistence(alert_name, true);
        }
        if transition.new_status == AlertStatus::Stopped {
            self.set_persistence(alert_name, false);
            for sensor_name in self.members_of(alert_name) {
                if let Some(obj) = self.persistence_object_of(&sensor_name) {
                    let bus = self.shared.bus.clone();
                    tokio::spawn(async move {
                        if let Err(err) = bus.set(&obj, ObjectValue::Bool(false)).await {
                            error!(%err, "failed to clear sensor persistence object");
                        }
                    });
                }
            }
        }
    }

    fn members_of(&self, alert_name: &AlertName) -> Vec<SensorName> {
        self.shared
            .sensors
            .values()
            .filter(|s| &s.config.alert == alert_name)
            .map(|s| s.config.name.clone())
            .collect()
    }

    fn persistence_object_of(&self, sensor: &SensorName) -> Option<ObjectId> {
        self.shared.sensors.get(sensor).and_then(|s| s.config.persistence_object.clone())
    }

    fn set_persistence(&self, alert_name: &AlertName, value: bool) {
        self.shared.alert_persistence.lock().insert(alert_name.clone(), value);
        if let Some(alert) = self.shared.alerts.get(alert_name) {
            if let Some(obj) = &alert.config.persistence_object {
                let obj = obj.clone();
                let bus = self.shared.bus.clone();
                tokio::spawn(async move {
                    if let Err(err) = bus.set(&obj, ObjectValue::Bool(value)).await {
                        error!(%err, "failed to write alert persistence object");
                    }
                });
            }
        }
    }

    async fn on_alert_persistence_changed(self: &Arc<Self>, alert_name: AlertName, value: ObjectValue) {
        let new_value = value.as_bool().unwrap_or(false);
        let was_true = self.alert_persistence_true(&alert_name);
        self.shared.alert_persistence.lock().insert(alert_name.clone(), new_value);
        if was_true && !new_value {
            // External clear: drive the alert straight to STOPPED (spec §9
            // open question 1, the "cleared from PAUSED" path).
            if let Some(alert) = self.shared.alerts.get(&alert_name) {
                let (effects, transition) = alert.stop();
                self.write_member_persistence(&alert_name, &transition);
                self.run_effects(effects).await;
            }
        }
    }

    async fn on_alert_inhibition_changed(&self, alert_name: AlertName, value: ObjectValue) {
        let inhibited = value.as_bool().unwrap_or(false);
        self.shared.alert_inhibited.lock().insert(alert_name, inhibited);
    }

    async fn on_enabled_object_changed(self: &Arc<Self>, sensor_name: SensorName, value: ObjectValue) {
        let Some(sensor) = self.shared.sensors.get(&sensor_name) else { return };
        let enabled = value.as_bool().unwrap_or(false);
        if !sensor.set_enabled(enabled) {
            return;
        }
        if enabled {
            if let Some(obj) = &sensor.config.persistence_object {
                let obj = obj.clone();
                let bus = self.shared.bus.clone();
                tokio::spawn(async move {
                    let _ = bus.set(&obj, ObjectValue::Bool(false)).await;
                });
            }
            return;
        }

        self.cancel_timer(TimerOwner::Activation(sensor_name.clone()));
        let alert_name = sensor.config.alert.clone();
        if let Some(alert) = self.shared.alerts.get(&alert_name) {
            if alert.is_member(&sensor_name) {
                let persistence_true = self.alert_persistence_true(&alert_name);
                let suspended = self.is_suspended();
                let current_mode = self.shared.mode.lock().current().cloned();
                let alert_duration_for = |name: &SensorName| -> std::time::Duration {
                    self.shared
                        .sensors
                        .get(name)
                        .map(|s| mdv_duration(&s.config.alert_duration, current_mode.as_ref()))
                        .unwrap_or_default()
                };
                let (effects, transition) =
                    alert.remove_sensor(&sensor_name, persistence_true, suspended, &alert_duration_for);
                if suspended {
                    self.shared.pending_flush.lock().insert(alert_name);
                } else if let Some(transition) = &transition {
                    self.write_member_persistence(&alert_name, transition);
                }
                self.run_effects(effects).await;
            }
        }
    }

    /// Mode object changed: emit ModeLeft for the old mode, swap in the
    /// new one, re-evaluate every sensor's activation timer/enablement
    /// against the new requirement set, then emit ModeEntered (spec §4.4).
    async fn on_mode_object_changed(self: &Arc<Self>, value: ObjectValue) {
        let code = value.as_int().unwrap_or(0);
        let new_mode = {
            let mode = self.shared.mode.lock();
            match mode.by_code(code) {
                Ok(m) => m.name.clone(),
                Err(err) => {
                    warn!(%err, code, "mode object changed to an unbound code");
                    return;
                }
            }
        };

        let guard = self.begin_suspend();

        let previous = {
            let mut mode = self.shared.mode.lock();
            mode.swap(new_mode.clone())
        };
        if let Some(previous) = previous {
            self.fire_mode_event(EventKind::ModeLeft, previous).await;
        }

        let required: HashSet<SensorName> = {
            let mode = self.shared.mode.lock();
            mode.required_sensors().iter().cloned().collect()
        };

        for sensor in self.shared.sensors.values() {
            let name = sensor.config.name.clone();
            let should_be_enabled = required.contains(&name);
            if should_be_enabled {
                if !sensor.is_enabled() {
                    self.start_activation_timer(name);
                }
            } else if sensor.is_enabled() {
                self.force_disable(name).await;
            } else {
                // Not yet enabled, no longer required: drop any activation
                // timer still counting down for it (spec §8 scenario S5).
                self.cancel_timer(TimerOwner::Activation(name));
            }
        }

        self.fire_mode_event(EventKind::ModeEntered, new_mode).await;
        guard.finish().await;
    }

    async fn force_disable(self: &Arc<Self>, sensor_name: SensorName) {
        let Some(sensor) = self.shared.sensors.get(&sensor_name) else { return };
        if !sensor.set_enabled(false) {
            return;
        }
        if let Err(err) = self.shared.bus.set(&sensor.config.enabled_object, ObjectValue::Bool(false)).await {
            error!(%err, "failed to write enabled=false");
        }
        self.cancel_timer(TimerOwner::Activation(sensor_name.clone()));
        let alert_name = sensor.config.alert.clone();
        if let Some(alert) = self.shared.alerts.get(&alert_name) {
            if alert.is_member(&sensor_name) {
                let persistence_true = self.alert_persistence_true(&alert_name);
                let current_mode = self.shared.mode.lock().current().cloned();
                let alert_duration_for = |name: &SensorName| -> std::time::Duration {
                    self.shared
                        .sensors
                        .get(name)
                        .map(|s| mdv_duration(&s.config.alert_duration, current_mode.as_ref()))
                        .unwrap_or_default()
                };
                let (effects, transition) =
                    alert.remove_sensor(&sensor_name, persistence_true, true, &alert_duration_for);
                self.shared.pending_flush.lock().insert(alert_name);
                let _ = transition;
                self.run_effects(effects).await;
            }
        }
    }

    async fn fire_mode_event(&self, kind: EventKind, mode: sv_core::ModeName) {
        let bindings = self.shared.mode.lock().by_name(&mode).map(|m| m.event_bindings.clone()).unwrap_or_default();
        let ctx = EventContext::for_mode(mode);
        let actions = event_manager::actions_for(kind, &bindings, &self.shared.repository_mode_bindings, &ctx);
        for action in actions {
            self.execute_action(action).await;
        }
    }

    fn start_activation_timer(self: &Arc<Self>, sensor_name: SensorName) {
        let Some(sensor) = self.shared.sensors.get(&sensor_name) else { return };
        let mode = self.shared.mode.lock().current().cloned();
        let delay = mdv_duration(&sensor.config.activation_delay, mode.as_ref());
        let owner = TimerOwner::Activation(sensor_name.clone());
        // A timer may already be counting down for this owner (mode
        // flapped back and forth); drop it rather than let it run
        // alongside the new one (`isActivationPending` in sensor.py).
        self.cancel_timer(owner.clone());

        let timer = Timer::new(format!("activation:{sensor_name}"), delay);

        if let Some(criterion) = sensor.config.activation_criterion.clone() {
            let sensors_for_iterate = self.arc();
            let timer_for_iterate = timer.clone();
            timer.on_iterate(move || {
                let satisfied = criterion.evaluate(&|name| {
                    sensors_for_iterate.shared.sensors.get(name).is_some_and(|s| s.is_triggered())
                });
                if satisfied {
                    if timer_for_iterate.is_paused() {
                        timer_for_iterate.reset();
                    }
                } else {
                    timer_for_iterate.pause();
                }
            });
        }

        let engine = self.arc();
        let owner_for_timeout = owner.clone();
        timer.on_timeout_reached(move || {
            let engine = engine.clone();
            let owner_for_timeout = owner_for_timeout.clone();
            tokio::spawn(async move { engine.on_activation_timer_fired(owner_for_timeout).await });
        });

        let mut timers = self.shared.timers.lock();
        timers.insert(owner, timer.clone());
        drop(timers);
        timer.start();
    }

    async fn on_activation_timer_fired(self: Arc<Self>, owner: TimerOwner) {
        let TimerOwner::Activation(sensor_name) = owner else { return };
        let Some(sensor) = self.shared.sensors.get(&sensor_name) else { return };
        // Re-check mode requirement: the mode may have changed again while
        // this timer was counting down (spec §5 race handling).
        if !self.shared.mode.lock().requires(&sensor_name) {
            return;
        }
        if !sensor.set_enabled(true) {
            return;
        }
        if let Err(err) = self.shared.bus.set(&sensor.config.enabled_object, ObjectValue::Bool(true)).await {
            error!(%err, %sensor_name, "failed to write enabled=true");
        }
        if let Some(obj) = &sensor.config.persistence_object {
            if let Err(err) = self.shared.bus.set(obj, ObjectValue::Bool(false)).await {
                error!(%err, "failed to clear sensor persistence object on activation");
            }
        }
    }

    async fn on_prealert_timer_fired(self: Arc<Self>, sensor_name: SensorName) {
        let Some(sensor) = self.shared.sensors.get(&sensor_name) else { return };
        let alert_name = sensor.config.alert.clone();
        let Some(alert) = self.shared.alerts.get(&alert_name) else { return };
        let current_mode = self.shared.mode.lock().current().cloned();
        let persistence_true = self.alert_persistence_true(&alert_name);
        let suspended = self.is_suspended();
        let alert_duration_for = |name: &SensorName| -> std::time::Duration {
            self.shared
                .sensors
                .get(name)
                .map(|s| mdv_duration(&s.config.alert_duration, current_mode.as_ref()))
                .unwrap_or_default()
        };

        let (effects, transition) =
            alert.notify_prealert_expired(&sensor_name, persistence_true, suspended, &alert_duration_for);
        if suspended {
            self.shared.pending_flush.lock().insert(alert_name);
        } else if let Some(transition) = &transition {
            self.write_member_persistence(&alert_name, transition);
        }
        self.run_effects(effects).await;
    }

    async fn on_alert_timer_fired(self: Arc<Self>, sensor_name: SensorName) {
        let Some(sensor) = self.shared.sensors.get(&sensor_name) else { return };
        let alert_name = sensor.config.alert.clone();
        let Some(alert) = self.shared.alerts.get(&alert_name) else { return };
        let persistence_true = self.alert_persistence_true(&alert_name);
        let suspended = self.is_suspended();
        let current_mode = self.shared.mode.lock().current().cloned();
        let alert_duration_for = |name: &SensorName| -> std::time::Duration {
            self.shared
                .sensors
                .get(name)
                .map(|s| mdv_duration(&s.config.alert_duration, current_mode.as_ref()))
                .unwrap_or_default()
        };
        let (effects, transition) = alert.remove_sensor(&sensor_name, persistence_true, suspended, &alert_duration_for);
        if suspended {
            self.shared.pending_flush.lock().insert(alert_name);
        } else if let Some(transition) = &transition {
            self.write_member_persistence(&alert_name, transition);
        }
        self.run_effects(effects).await;
    }

    fn cancel_timer(&self, owner: TimerOwner) {
        if let Some(timer) = self.shared.timers.lock().get(&owner) {
            timer.stop();
        }
    }

    /// Execute a batch of effects outside any state-machine lock (spec §5).
    async fn run_effects(self: &Arc<Self>, effects: Vec<Effect>) {
        for effect in effects {
            self.run_effect(effect).await;
        }
    }

    async fn run_effect(self: &Arc<Self>, effect: Effect) {
        match effect {
            Effect::SetTimer { owner, duration } => self.set_timer(owner, duration),
            Effect::CancelTimer { owner } => self.cancel_timer(owner),
            Effect::WriteObject { object, value } => {
                if let Err(err) = self.shared.bus.set(&object, value).await {
                    error!(%err, %object, "failed to write object");
                }
            }
            Effect::ExecuteAction { action } => self.execute_action(action).await,
            Effect::Emit { event, context } => self.fire_alert_event(event, context).await,
        }
    }

    fn set_timer(self: &Arc<Self>, owner: TimerOwner, duration: std::time::Duration) {
        let mut timers = self.shared.timers.lock();
        if let Some(existing) = timers.get(&owner) {
            if !existing.is_terminated() {
                existing.extend();
                return;
            }
        }

        let label = format!("{owner:?}");
        let timer = Timer::new(label, duration);
        let engine = self.arc();
        let owner_for_timeout = owner.clone();
        timer.on_timeout_reached(move || {
            let engine = engine.clone();
            let owner_for_timeout = owner_for_timeout.clone();
            tokio::spawn(async move {
                match owner_for_timeout {
                    TimerOwner::Prealert(sensor) => engine.on_prealert_timer_fired(sensor).await,
                    TimerOwner::Alert(sensor) => engine.on_alert_timer_fired(sensor).await,
                    TimerOwner::Activation(_) => {}
                }
            });
        });
        timers.insert(owner, timer.clone());
        drop(timers);
        timer.start();
    }

    async fn fire_alert_event(&self, event: EventKind, ctx: EventContext) {
        let Some(alert_name) = &ctx.alert else { return };
        let bindings = self.shared.alerts.get(alert_name).map(|a| a.config.event_bindings.clone()).unwrap_or_default();
        let actions = event_manager::actions_for(event, &bindings, &self.shared.repository_alert_bindings, &ctx);
        info!(?event, alert = %alert_name, actions = actions.len(), "firing alert event");
        for action in actions {
            self.execute_action(action).await;
        }
    }

    async fn execute_action(&self, action: sv_core::ActionDescriptor) {
        if let Err(err) = crate::action_executor::execute(self.shared.bus.as_ref(), action).await {
            error!(%err, "action execution failed");
        }
    }

    pub fn alert_status(&self, name: &AlertName) -> Option<sv_core::AlertStatus> {
        self.shared.alerts.get(name).map(|a| a.status())
    }

    pub fn is_sensor_enabled(&self, name: &SensorName) -> bool {
        self.shared.sensors.get(name).is_some_and(|s| s.is_enabled())
    }

    pub fn current_mode(&self) -> Option<sv_core::ModeName> {
        self.shared.mode.lock().current().cloned()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
