use super::*;
use sv_core::AlertConfig;

fn alert() -> AlertRuntime {
    AlertRuntime::new(AlertConfig {
        name: "A".into(),
        persistence_object: Some("persist-A".into()),
        inhibition_object: None,
        event_bindings: Vec::new(),
    })
}

fn alert_no_persistence() -> AlertRuntime {
    AlertRuntime::new(AlertConfig {
        name: "A".into(),
        persistence_object: None,
        inhibition_object: None,
        event_bindings: Vec::new(),
    })
}

fn alert_duration(_: &SensorName) -> Duration {
    Duration::from_secs(3)
}

fn events(effects: &[Effect]) -> Vec<EventKind> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Emit { event, .. } => Some(*event),
            _ => None,
        })
        .collect()
}

#[test]
fn first_sensor_join_starts_prealert() {
    let alert = alert();
    let (effects, transition) = alert.add_sensor(
        &"K".into(),
        Duration::from_secs(2),
        false,
        false,
        false,
        &alert_duration,
    );
    assert_eq!(events(&effects), vec![EventKind::PrealertStarted]);
    assert_eq!(alert.status(), AlertStatus::Initializing);
    assert_eq!(transition.unwrap().new_status, AlertStatus::Initializing);
}

#[test]
fn prealert_expiry_activates_alert() {
    let alert = alert();
    alert.add_sensor(&"K".into(), Duration::from_secs(2), false, false, false, &alert_duration);
    let (effects, _) = alert.notify_prealert_expired(&"K".into(), false, false, &alert_duration);
    assert_eq!(events(&effects), vec![EventKind::SensorJoined, EventKind::AlertActivated]);
    assert_eq!(alert.status(), AlertStatus::Active);
    assert_eq!(alert.sensors_in_alert(), vec![SensorName::from("K")]);
}

#[test]
fn last_member_leaving_with_persistence_pauses() {
    let alert = alert();
    alert.add_sensor(&"K".into(), Duration::from_secs(2), false, false, false, &alert_duration);
    alert.notify_prealert_expired(&"K".into(), false, false, &alert_duration);
    let (effects, _) = alert.remove_sensor(&"K".into(), true, false, &alert_duration);
    assert_eq!(
        events(&effects),
        vec![EventKind::SensorLeft, EventKind::AlertDeactivated, EventKind::AlertPaused]
    );
    assert_eq!(alert.status(), AlertStatus::Paused);
}

#[test]
fn last_member_leaving_without_persistence_stops() {
    let alert = alert_no_persistence();
    alert.add_sensor(&"K".into(), Duration::from_secs(2), false, false, false, &alert_duration);
    alert.notify_prealert_expired(&"K".into(), false, false, &alert_duration);
    let (effects, _) = alert.remove_sensor(&"K".into(), false, false, &alert_duration);
    assert_eq!(
        events(&effects),
        vec![
            EventKind::SensorLeft,
            EventKind::AlertDeactivated,
            EventKind::AlertReset,
            EventKind::AlertStopped
        ]
    );
    assert_eq!(alert.status(), AlertStatus::Stopped);
}

#[test]
fn join_while_paused_resumes_without_prealert() {
    let alert = alert();
    alert.add_sensor(&"K".into(), Duration::from_secs(2), false, false, false, &alert_duration);
    alert.notify_prealert_expired(&"K".into(), false, false, &alert_duration);
    alert.remove_sensor(&"K".into(), true, false, &alert_duration);
    assert_eq!(alert.status(), AlertStatus::Paused);

    let (effects, _) = alert.add_sensor(&"W".into(), Duration::from_secs(2), false, true, false, &alert_duration);
    assert_eq!(
        events(&effects),
        vec![EventKind::AlertResumed, EventKind::SensorJoined, EventKind::AlertActivated]
    );
    assert_eq!(alert.status(), AlertStatus::Active);
    assert!(alert.sensors_in_prealert().is_empty());
}

#[test]
fn retrigger_while_active_extends_timer_without_events() {
    let alert = alert();
    alert.add_sensor(&"K".into(), Duration::from_secs(2), false, false, false, &alert_duration);
    alert.notify_prealert_expired(&"K".into(), false, false, &alert_duration);

    let (effects, transition) = alert.add_sensor(&"K".into(), Duration::from_secs(2), false, false, false, &alert_duration);
    assert!(transition.is_none());
    assert!(matches!(effects.as_slice(), [Effect::SetTimer { owner: TimerOwner::Alert(_), .. }]));
    assert_eq!(alert.status(), AlertStatus::Active);
}

#[test]
fn inhibition_blocks_new_join_with_no_effects() {
    let alert = alert();
    let (effects, transition) = alert.add_sensor(&"K".into(), Duration::from_secs(2), true, false, false, &alert_duration);
    assert!(effects.is_empty());
    assert!(transition.is_none());
    assert_eq!(alert.status(), AlertStatus::Stopped);
    assert!(!alert.is_member(&"K".into()));
}

#[test]
fn stop_drains_membership_and_emits_reset_stopped_from_active() {
    let alert = alert();
    alert.add_sensor(&"K".into(), Duration::from_secs(2), false, false, false, &alert_duration);
    alert.notify_prealert_expired(&"K".into(), false, false, &alert_duration);
    let (effects, transition) = alert.stop();
    assert_eq!(
        events(&effects),
        vec![
            EventKind::SensorLeft,
            EventKind::AlertDeactivated,
            EventKind::AlertReset,
            EventKind::AlertStopped
        ]
    );
    assert_eq!(transition.new_status, AlertStatus::Stopped);
    assert!(alert.sensors_in_alert().is_empty());
}

#[test]
fn stop_from_initializing_emits_aborted() {
    let alert = alert();
    alert.add_sensor(&"K".into(), Duration::from_secs(2), false, false, false, &alert_duration);
    let (effects, _) = alert.stop();
    assert_eq!(events(&effects), vec![EventKind::AlertAborted, EventKind::AlertStopped]);
}

#[test]
fn suspended_batch_collapses_intermediate_states() {
    // D joins (prealert), then W joins and immediately expires into alert
    // while suspended: only the net STOPPED->ACTIVE transition should be
    // observable once flushed (spec §4.3 "Batched updates", scenario S3).
    let alert = alert();
    let (effects, transition) = alert.add_sensor(&"D".into(), Duration::from_secs(6), false, false, true, &alert_duration);
    assert!(effects.is_empty());
    assert!(transition.is_none());

    let (effects, transition) = alert.notify_prealert_expired(&"D".into(), false, true, &alert_duration);
    assert!(effects.is_empty());
    assert!(transition.is_none());

    let (effects, transition) = alert.flush_suspended(false, &alert_duration);
    assert_eq!(events(&effects), vec![EventKind::SensorJoined, EventKind::AlertActivated]);
    let transition = transition.unwrap();
    assert_eq!(transition.old_status, AlertStatus::Stopped);
    assert_eq!(transition.new_status, AlertStatus::Active);
}

#[test]
fn flush_suspended_is_noop_when_nothing_changed() {
    let alert = alert();
    let (effects, transition) = alert.flush_suspended(false, &alert_duration);
    assert!(effects.is_empty());
    assert!(transition.is_none());
}
